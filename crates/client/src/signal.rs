//! Listener lists for client notifications.
//!
//! A [`Signal`] passes events through as they happen: listeners registered
//! after an emit never see it.

use std::fmt;

/// Handle identifying one listener of a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// Ordered list of callbacks invoked on [`Signal::emit`].
pub struct Signal<T> {
	next_id: u64,
	listeners: Vec<(Subscription, Listener<T>)>,
	once: Vec<Box<dyn FnOnce(&T)>>,
}

impl<T> Default for Signal<T> {
	fn default() -> Self {
		Self {
			next_id: 0,
			listeners: Vec::new(),
			once: Vec::new(),
		}
	}
}

impl<T> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("listeners", &self.listeners.len())
			.field("once", &self.once.len())
			.finish()
	}
}

impl<T> Signal<T> {
	/// Creates a signal without listeners.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener called on every emit until unsubscribed.
	pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> Subscription {
		let handle = Subscription(self.next_id);
		self.next_id += 1;
		self.listeners.push((handle, Box::new(listener)));
		handle
	}

	/// Registers a listener called on the next emit only.
	pub fn once(&mut self, listener: impl FnOnce(&T) + 'static) {
		self.once.push(Box::new(listener));
	}

	/// Removes the listener registered under `handle`.
	///
	/// Returns false if it was already removed.
	pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(h, _)| *h != handle);
		self.listeners.len() != before
	}

	/// Calls every listener with `value`, persistent ones first.
	pub fn emit(&mut self, value: &T) {
		for (_, listener) in &mut self.listeners {
			listener(value);
		}
		for listener in std::mem::take(&mut self.once) {
			listener(value);
		}
	}

	/// Number of registered listeners, `once` listeners included.
	pub fn len(&self) -> usize {
		self.listeners.len() + self.once.len()
	}

	/// Returns true if nothing is listening.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
