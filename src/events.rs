//! Observer registration for cache lifecycle events.

// self
use crate::_prelude::*;

/// Payload-free events broadcast by [`TokenCache`](crate::TokenCache).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenEvent {
	/// A refresh started because the cached token was missing or expired.
	RetrievingToken,
	/// A delivered token was written into the store.
	TokenReceived,
}
impl TokenEvent {
	/// Returns the stable event name.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenEvent::RetrievingToken => "RetrievingToken",
			TokenEvent::TokenReceived => "tokenReceived",
		}
	}
}
impl Display for TokenEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Receives [`TokenEvent`]s. Implemented for any `Fn(TokenEvent)` closure.
pub trait TokenObserver
where
	Self: Send + Sync,
{
	/// Called synchronously on the emitting task.
	fn on_event(&self, event: TokenEvent);
}
impl<F> TokenObserver for F
where
	F: Fn(TokenEvent) + Send + Sync,
{
	fn on_event(&self, event: TokenEvent) {
		self(event)
	}
}

/// Ordered list of registered observers.
#[derive(Clone, Default)]
pub struct Observers(Arc<RwLock<Vec<Arc<dyn TokenObserver>>>>);
impl Observers {
	/// Registers an observer; observers are notified in registration order.
	pub fn subscribe(&self, observer: Arc<dyn TokenObserver>) {
		self.0.write().push(observer);
	}

	/// Notifies every registered observer.
	pub fn emit(&self, event: TokenEvent) {
		// Snapshot so observers may subscribe re-entrantly.
		let observers = self.0.read().clone();

		for observer in observers {
			observer.on_event(event);
		}
	}

	/// Number of registered observers.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nobody is listening.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl Debug for Observers {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Observers").field("len", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn event_names_are_stable() {
		assert_eq!(TokenEvent::RetrievingToken.to_string(), "RetrievingToken");
		assert_eq!(TokenEvent::TokenReceived.to_string(), "tokenReceived");
	}

	#[test]
	fn observers_fire_in_registration_order() {
		let observers = Observers::default();
		let seen = Arc::new(Mutex::new(Vec::new()));

		for label in ["first", "second"] {
			let seen = seen.clone();

			observers.subscribe(Arc::new(move |event: TokenEvent| {
				seen.lock().push((label, event));
			}));
		}

		observers.emit(TokenEvent::RetrievingToken);

		assert_eq!(
			*seen.lock(),
			vec![("first", TokenEvent::RetrievingToken), ("second", TokenEvent::RetrievingToken)]
		);
	}
}
