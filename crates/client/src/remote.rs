//! Remote peers and their rendered selections.

use weft_primitives::Selection;

use crate::surface::PresenceRenderer;

/// Another client editing the same document.
///
/// `Marker` is the handle type of the [`PresenceRenderer`] showing the peer's
/// selection.
#[derive(Debug, Clone)]
pub struct RemoteClient<Id, Marker> {
	id: Id,
	name: String,
	last_selection: Option<Selection>,
	marker: Option<Marker>,
}

/// Snapshot of a peer for change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSummary<Id> {
	/// Peer id.
	pub id: Id,
	/// Display name, empty if unknown.
	pub name: String,
	/// Last known selection.
	pub selection: Option<Selection>,
}

impl<Id: Clone, Marker> RemoteClient<Id, Marker> {
	/// Creates a peer without a selection.
	pub fn new(id: Id, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			last_selection: None,
			marker: None,
		}
	}

	/// Sets the selection to render once the peer is attached to a renderer.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.last_selection = Some(selection);
		self
	}

	pub fn id(&self) -> &Id {
		&self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn last_selection(&self) -> Option<&Selection> {
		self.last_selection.as_ref()
	}

	/// Returns true while a selection of this peer is rendered.
	pub fn is_marked(&self) -> bool {
		self.marker.is_some()
	}

	/// Takes the selection without clearing any marker, for re-basing before [`Self::attach`].
	pub(crate) fn take_selection(&mut self) -> Option<Selection> {
		self.last_selection.take()
	}

	pub fn summary(&self) -> PeerSummary<Id> {
		PeerSummary {
			id: self.id.clone(),
			name: self.name.clone(),
			selection: self.last_selection.clone(),
		}
	}

	/// Renders the last known selection, if any, on `renderer`.
	pub fn attach<R>(&mut self, renderer: &mut R)
	where
		R: PresenceRenderer<Id, Marker = Marker>,
	{
		if let Some(selection) = self.last_selection.clone() {
			self.update_selection(renderer, selection);
		}
	}

	/// Replaces the rendered selection.
	pub fn update_selection<R>(&mut self, renderer: &mut R, selection: Selection)
	where
		R: PresenceRenderer<Id, Marker = Marker>,
	{
		self.remove_selection(renderer);
		self.marker = Some(renderer.mark_selection(&self.id, &self.name, &selection));
		self.last_selection = Some(selection);
	}

	/// Clears the rendered selection and forgets it.
	pub fn remove_selection<R>(&mut self, renderer: &mut R)
	where
		R: PresenceRenderer<Id, Marker = Marker>,
	{
		if let Some(marker) = self.marker.take() {
			renderer.clear_selection(marker);
		}
		self.last_selection = None;
	}

	/// Renames the peer, re-rendering its selection under the new name.
	///
	/// Returns false if the name did not change.
	pub fn set_name<R>(&mut self, renderer: &mut R, name: &str) -> bool
	where
		R: PresenceRenderer<Id, Marker = Marker>,
	{
		if self.name == name {
			return false;
		}
		self.name = name.to_owned();
		self.attach(renderer);
		true
	}
}
