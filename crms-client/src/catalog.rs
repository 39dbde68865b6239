//! Resource catalog
//!
//! Loads the rooms and equipment currently marked available, filters them
//! by a search string, and owns the single selection slot that binds a
//! [`ReservationForm`] to one resource.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use shared::{Equipment, NewReservation, Notification, Resource, ResourceKind, Room, TableQuery};
use uuid::Uuid;

use crate::backend::{self, TableClient};
use crate::error::BookingResult;
use crate::form::{ReservationForm, SubmitContext};
use crate::notify::Notifier;

/// Available rooms, ordered by name
pub fn rooms_query() -> TableQuery {
    TableQuery::all(ResourceKind::Room.table())
        .eq("is_available", true)
        .order_by("name")
}

/// Available equipment, ordered by name
pub fn equipment_query() -> TableQuery {
    TableQuery::all(ResourceKind::Equipment.table())
        .eq("is_available", true)
        .order_by("name")
}

/// Loaded rooms and equipment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub rooms: Vec<Room>,
    pub equipment: Vec<Equipment>,
}

/// Catalog entries matching a search string
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCatalog<'a> {
    pub rooms: Vec<&'a Room>,
    pub equipment: Vec<&'a Equipment>,
}

impl Catalog {
    /// Case-insensitive filter: rooms by name or location, equipment by
    /// name or type. An empty search keeps everything.
    pub fn filter(&self, search: &str) -> FilteredCatalog<'_> {
        let needle = search.to_lowercase();
        FilteredCatalog {
            rooms: self.rooms.iter().filter(|r| r.matches(&needle)).collect(),
            equipment: self.equipment.iter().filter(|e| e.matches(&needle)).collect(),
        }
    }

    pub fn find(&self, id: Uuid, kind: ResourceKind) -> Option<Resource> {
        match kind {
            ResourceKind::Room => self
                .rooms
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .map(Resource::from),
            ResourceKind::Equipment => self
                .equipment
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .map(Resource::from),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.equipment.is_empty()
    }
}

/// Fetches the catalog from the backend
#[derive(Clone)]
pub struct CatalogLoader {
    backend: Arc<dyn TableClient>,
    notifier: Arc<dyn Notifier>,
}

impl CatalogLoader {
    pub fn new(backend: Arc<dyn TableClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Fetch rooms and equipment concurrently.
    ///
    /// Each list fails on its own: a failed list is reported and left empty,
    /// the other one is still returned.
    pub async fn load(&self) -> Catalog {
        let (rooms, equipment) = tokio::join!(
            self.fetch::<Room>(rooms_query(), "Failed to load rooms."),
            self.fetch::<Equipment>(equipment_query(), "Failed to load equipment."),
        );
        tracing::debug!(rooms = rooms.len(), equipment = equipment.len(), "Catalog loaded");
        Catalog { rooms, equipment }
    }

    async fn fetch<T: DeserializeOwned>(&self, query: TableQuery, failure: &str) -> Vec<T> {
        match backend::select_rows::<T>(self.backend.as_ref(), &query).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(table = %query.table, error = %e, "Error fetching catalog");
                self.notifier.notify(Notification::error("Error", failure));
                Vec::new()
            }
        }
    }
}

/// Browse-and-book state: catalog, search string and at most one open form
pub struct CatalogView {
    loader: CatalogLoader,
    catalog: Catalog,
    search: String,
    selection: Option<ReservationForm>,
}

impl CatalogView {
    pub fn new(loader: CatalogLoader) -> Self {
        Self {
            loader,
            catalog: Catalog::default(),
            search: String::new(),
            selection: None,
        }
    }

    /// Reload the catalog from the backend
    pub async fn refresh(&mut self) {
        self.catalog = self.loader.load().await;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Catalog filtered by the current search string
    pub fn filtered(&self) -> FilteredCatalog<'_> {
        self.catalog.filter(&self.search)
    }

    /// Open a form for a loaded resource, replacing any open form.
    /// Returns `false` (and leaves the slot alone) for unknown resources.
    pub fn select(&mut self, id: Uuid, kind: ResourceKind) -> bool {
        match self.catalog.find(id, kind) {
            Some(resource) => {
                self.selection = Some(ReservationForm::new(resource.to_ref()));
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> Option<&ReservationForm> {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> Option<&mut ReservationForm> {
        self.selection.as_mut()
    }

    /// Close the open form without submitting
    pub fn close(&mut self) {
        self.selection = None;
    }

    /// Submit the open form; the form closes only when the request was
    /// created. `Ok(None)` when no form is open.
    pub async fn submit_selection<S: FnOnce()>(
        &mut self,
        ctx: &SubmitContext<'_>,
        on_success: S,
    ) -> BookingResult<Option<NewReservation>> {
        let today = Local::now().date_naive();
        self.submit_selection_on(ctx, today, on_success).await
    }

    /// [`Self::submit_selection`] with an explicit "today"
    pub async fn submit_selection_on<S: FnOnce()>(
        &mut self,
        ctx: &SubmitContext<'_>,
        today: NaiveDate,
        on_success: S,
    ) -> BookingResult<Option<NewReservation>> {
        let Some(form) = self.selection.as_mut() else {
            return Ok(None);
        };

        let mut close = false;
        let result = form.submit_on(ctx, today, on_success, || close = true).await;
        if close {
            self.selection = None;
        }
        result.map(Some)
    }
}
