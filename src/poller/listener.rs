use crate::eta::RemainingTime;
use crate::model::Order;
use tokio::sync::mpsc;
use tracing::debug;

/// Receives the outcome of every poll.
///
/// All three methods run on the poller's task, one at a time and in poll
/// order. They must not block: the next poll cannot start until they return.
pub trait DeliveryListener: Send + 'static {
    /// A non-terminal snapshot arrived.
    fn on_update(&mut self, order: &Order, remaining: &RemainingTime);

    /// The order reached `COMPLETED`. Called at most once, after which the
    /// poller exits.
    fn on_terminal(&mut self, order: &Order);

    /// A fetch failed. Polling continues on the next tick.
    fn on_error(&mut self, message: &str);
}

/// Adapts three closures into a [`DeliveryListener`].
///
/// ```
/// use delivery_tracker::eta::RemainingTime;
/// use delivery_tracker::model::Order;
/// use delivery_tracker::poller::Callbacks;
///
/// let listener = Callbacks::new(
///     |order: &Order, remaining: &RemainingTime| {
///         println!("order {} arrives in {remaining}", order.id)
///     },
///     |order: &Order| println!("order {} delivered", order.id),
///     |message: &str| eprintln!("refresh failed: {message}"),
/// );
/// # let _ = listener;
/// ```
pub struct Callbacks<U, T, E> {
    on_update: U,
    on_terminal: T,
    on_error: E,
}

impl<U, T, E> Callbacks<U, T, E>
where
    U: FnMut(&Order, &RemainingTime) + Send + 'static,
    T: FnMut(&Order) + Send + 'static,
    E: FnMut(&str) + Send + 'static,
{
    pub fn new(on_update: U, on_terminal: T, on_error: E) -> Self {
        Self {
            on_update,
            on_terminal,
            on_error,
        }
    }
}

impl<U, T, E> DeliveryListener for Callbacks<U, T, E>
where
    U: FnMut(&Order, &RemainingTime) + Send + 'static,
    T: FnMut(&Order) + Send + 'static,
    E: FnMut(&str) + Send + 'static,
{
    fn on_update(&mut self, order: &Order, remaining: &RemainingTime) {
        (self.on_update)(order, remaining)
    }

    fn on_terminal(&mut self, order: &Order) {
        (self.on_terminal)(order)
    }

    fn on_error(&mut self, message: &str) {
        (self.on_error)(message)
    }
}

/// One poll outcome, as forwarded by [`ChannelListener`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryEvent {
    Updated {
        order: Order,
        remaining: RemainingTime,
    },
    Completed(Order),
    Failed(String),
}

/// Forwards every poll outcome into an unbounded channel.
///
/// Use this when the consumer lives on another task, e.g. a display loop
/// that owns the terminal.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<DeliveryEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeliveryEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, event: DeliveryEvent) {
        if self.sender.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

impl DeliveryListener for ChannelListener {
    fn on_update(&mut self, order: &Order, remaining: &RemainingTime) {
        self.forward(DeliveryEvent::Updated {
            order: order.clone(),
            remaining: remaining.clone(),
        });
    }

    fn on_terminal(&mut self, order: &Order) {
        self.forward(DeliveryEvent::Completed(order.clone()));
    }

    fn on_error(&mut self, message: &str) {
        self.forward(DeliveryEvent::Failed(message.to_string()));
    }
}
