use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("parlor.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("parlor.client.request_errors");
pub(crate) static CLIENT_AUTHORIZED_REQUESTS: Counter =
    Counter::new("parlor.client.authorized_requests");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("parlor.client.request_duration_seconds");

pub(crate) static ROUTER_NAVIGATIONS: Counter = Counter::new("parlor.router.navigations");
pub(crate) static ROUTER_IGNORED: Counter = Counter::new("parlor.router.ignored_fragments");
pub(crate) static ROUTER_SUBMISSIONS: Counter = Counter::new("parlor.router.submissions");

pub(crate) static CHAT_SOCKETS_OPENED: Counter = Counter::new("parlor.chat.sockets_opened");
pub(crate) static CHAT_SOCKETS_CLOSED: Counter = Counter::new("parlor.chat.sockets_closed");
pub(crate) static CHAT_FRAMES_SENT: Counter = Counter::new("parlor.chat.frames_sent");
pub(crate) static CHAT_FRAMES_RECEIVED: Counter = Counter::new("parlor.chat.frames_received");
pub(crate) static CHAT_DROPPED_FRAMES: Counter = Counter::new("parlor.chat.dropped_frames");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_AUTHORIZED_REQUESTS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&ROUTER_NAVIGATIONS);
    collector.register_counter(&ROUTER_IGNORED);
    collector.register_counter(&ROUTER_SUBMISSIONS);

    collector.register_counter(&CHAT_SOCKETS_OPENED);
    collector.register_counter(&CHAT_SOCKETS_CLOSED);
    collector.register_counter(&CHAT_FRAMES_SENT);
    collector.register_counter(&CHAT_FRAMES_RECEIVED);
    collector.register_counter(&CHAT_DROPPED_FRAMES);
}
