//! Report submission workflow
//!
//! ```text
//! Idle -> PhotoSelected -> Resolving -> ReadyToSubmit -> Uploading -> Persisting -> Done
//!                                            ^                |             |
//!                                            +---- Failed <---+-------------+
//! ```
//!
//! Selecting a photo runs location resolution and classification
//! concurrently on a background task; the draft can be filled in by hand
//! while they run and submitted as soon as it is complete. Submitting validates locally before any network call,
//! forward-geocodes a hand-edited address, then uploads and persists. A
//! failed upload or persist lands in `Failed` and returns to
//! `ReadyToSubmit` with the draft intact.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::address::AddressResolver;
use crate::client::api::ReportBackend;
use crate::client::error::SubmissionError;
use crate::client::geolocation::{Coordinates, GeolocationResolver, ResolvedLocation};
use crate::client::photo::Photo;
use crate::features::analysis::dtos::AnalyzeImageResponseDto;
use crate::features::sightings::dtos::CreateSightingDto;
use crate::features::sightings::models::{Category, LocationSource};
use crate::features::uploads::dtos::UploadResponseDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    PhotoSelected,
    /// Location and classification in flight
    Resolving,
    ReadyToSubmit,
    Uploading,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything the user has picked or the resolvers have filled in
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub photo: Option<Photo>,
    pub owner_id: Option<String>,
    pub category: Option<Category>,
    /// Labels from the classification call, for display
    pub labels: Vec<String>,
    pub coordinates: Option<Coordinates>,
    pub location_source: LocationSource,
    pub address: Option<String>,
    /// The address was typed by the user and has no coordinates yet
    pub address_edited: bool,
    pub note: String,
}

/// Suggestions gathered for a selected photo
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub resolved: ResolvedLocation,
    pub address: Option<String>,
    pub classification: Option<AnalyzeImageResponseDto>,
}

/// Location and classification in flight for a selected photo
pub struct Resolution {
    handle: JoinHandle<ResolutionOutcome>,
}

impl Resolution {
    pub async fn outcome(self) -> ResolutionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Photo resolution task failed: {}", e);
                ResolutionOutcome {
                    resolved: ResolvedLocation {
                        coordinates: None,
                        source: LocationSource::Unset,
                    },
                    address: None,
                    classification: None,
                }
            }
        }
    }
}

pub struct SubmissionWorkflow {
    backend: Arc<dyn ReportBackend>,
    geolocation: Arc<GeolocationResolver>,
    addresses: Arc<AddressResolver>,
    state: WorkflowState,
    history: Vec<WorkflowState>,
    draft: Draft,
    /// Kept across retries so a failed persist does not upload twice
    uploaded: Option<UploadResponseDto>,
    last_error: Option<String>,
    created_id: Option<Uuid>,
}

impl SubmissionWorkflow {
    pub fn new(
        backend: Arc<dyn ReportBackend>,
        geolocation: Arc<GeolocationResolver>,
        addresses: Arc<AddressResolver>,
    ) -> Self {
        Self {
            backend,
            geolocation,
            addresses,
            state: WorkflowState::Idle,
            history: vec![WorkflowState::Idle],
            draft: Draft::default(),
            uploaded: None,
            last_error: None,
            created_id: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The message shown for the last failed attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn created_id(&self) -> Option<Uuid> {
        self.created_id
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::debug!("Submission workflow: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    fn ensure_editable(&self) -> Result<(), SubmissionError> {
        match self.state {
            WorkflowState::Done => Err(SubmissionError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    pub fn set_owner(&mut self, owner_id: Option<String>) -> Result<(), SubmissionError> {
        self.ensure_editable()?;
        self.draft.owner_id = owner_id.filter(|o| !o.trim().is_empty());
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) -> Result<(), SubmissionError> {
        self.ensure_editable()?;
        self.draft.category = Some(category);
        Ok(())
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), SubmissionError> {
        self.ensure_editable()?;
        self.draft.note = note.into();
        Ok(())
    }

    /// Hand-entered coordinates; the address shown is left as typed
    pub fn set_coordinates(&mut self, at: Coordinates) -> Result<(), SubmissionError> {
        self.ensure_editable()?;
        if !at.is_valid() {
            return Err(SubmissionError::Validation(
                "Coordinates are out of range".to_string(),
            ));
        }
        self.draft.coordinates = Some(at);
        self.draft.location_source = LocationSource::Manual;
        self.draft.address_edited = false;
        Ok(())
    }

    /// Hand-edited address; coordinates are looked up again at submit time
    pub fn edit_address(&mut self, address: impl Into<String>) -> Result<(), SubmissionError> {
        self.ensure_editable()?;
        let address = address.into();
        if address.trim().is_empty() {
            self.draft.address = None;
            self.draft.address_edited = false;
        } else {
            self.draft.address = Some(address);
            self.draft.address_edited = true;
            self.draft.coordinates = None;
            self.draft.location_source = LocationSource::Manual;
        }
        Ok(())
    }

    /// Pick the photo and wait for its location and category suggestions
    ///
    /// Shorthand for [`start_resolution`](Self::start_resolution) followed by
    /// [`apply_resolution`](Self::apply_resolution) with nothing in between.
    pub async fn select_photo(&mut self, photo: Photo) -> Result<(), SubmissionError> {
        let resolution = self.start_resolution(photo)?;
        let outcome = resolution.outcome().await;
        self.apply_resolution(outcome);
        Ok(())
    }

    /// Pick the photo and start location resolution and classification
    ///
    /// Both run concurrently on a background task that holds no borrow of the
    /// workflow, so the draft stays editable (and submittable once complete)
    /// while they are in flight. Hand the outcome to `apply_resolution`.
    pub fn start_resolution(&mut self, photo: Photo) -> Result<Resolution, SubmissionError> {
        self.ensure_editable()?;
        if self.state != WorkflowState::Idle {
            return Err(SubmissionError::Validation(
                "A photo is already selected".to_string(),
            ));
        }

        self.draft.photo = Some(photo.clone());
        self.transition(WorkflowState::PhotoSelected);
        self.transition(WorkflowState::Resolving);

        let backend = Arc::clone(&self.backend);
        let geolocation = Arc::clone(&self.geolocation);
        let addresses = Arc::clone(&self.addresses);
        let handle = tokio::spawn(async move {
            let locate = async {
                let resolved = geolocation.resolve(&photo.data).await;
                let address = match resolved.coordinates {
                    Some(at) => Some(addresses.reverse_geocode(at).await),
                    None => None,
                };
                (resolved, address)
            };
            let classify = backend.analyze_image(&photo);

            let ((resolved, address), classification) = tokio::join!(locate, classify);
            let classification = classification
                .map_err(|e| warn!("Classification failed, category left for the user: {}", e))
                .ok();

            ResolutionOutcome {
                resolved,
                address,
                classification,
            }
        });

        Ok(Resolution { handle })
    }

    /// Fill in whatever the user has not entered meanwhile
    ///
    /// Neither failure is surfaced: a missing location stays unset and a
    /// failed classification leaves the category for the user. An outcome
    /// arriving after the report was submitted is dropped.
    pub fn apply_resolution(&mut self, outcome: ResolutionOutcome) {
        if self.state == WorkflowState::Done {
            tracing::debug!("Resolution finished after submission, ignored");
            return;
        }

        self.apply_location(outcome.resolved, outcome.address);
        if let Some(analysis) = outcome.classification {
            if self.draft.category.is_none() {
                self.draft.category = Some(analysis.detected_type);
            }
            self.draft.labels = analysis.labels;
        }

        if self.state == WorkflowState::Resolving {
            self.transition(WorkflowState::ReadyToSubmit);
        }
    }

    /// A photo, a category and some location are present
    pub fn is_submittable(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::Resolving | WorkflowState::ReadyToSubmit
        ) && self.validate().is_ok()
    }

    fn apply_location(&mut self, resolved: ResolvedLocation, address: Option<String>) {
        let user_entered = self.draft.location_source == LocationSource::Manual;
        if user_entered {
            return;
        }
        self.draft.coordinates = resolved.coordinates;
        self.draft.location_source = resolved.source;
        self.draft.address = address;
        self.draft.address_edited = false;
    }

    /// Local checks only; no network call is made when this fails
    fn validate(&self) -> Result<(&Photo, Category), SubmissionError> {
        let photo = self
            .draft
            .photo
            .as_ref()
            .ok_or_else(|| SubmissionError::Validation("Please select a photo".to_string()))?;
        let category = self
            .draft
            .category
            .ok_or_else(|| SubmissionError::Validation("Please choose a category".to_string()))?;
        if self.draft.coordinates.is_none() && self.draft.address.is_none() {
            return Err(SubmissionError::Validation(
                "Please provide a location".to_string(),
            ));
        }
        Ok((photo, category))
    }

    fn fail(&mut self, message: String) -> SubmissionError {
        warn!("Submission failed: {}", message);
        self.last_error = Some(message.clone());
        self.transition(WorkflowState::Failed);
        self.transition(WorkflowState::ReadyToSubmit);
        SubmissionError::Collaborator(message)
    }

    /// Upload the photo and create the record; returns the new record id
    pub async fn submit(&mut self) -> Result<Uuid, SubmissionError> {
        self.ensure_editable()?;
        let (photo, category) = match self.validate() {
            Ok((photo, category)) => (photo.clone(), category),
            Err(e) => {
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let coordinates = match self.draft.coordinates {
            Some(at) => at,
            None => {
                // validate() guarantees an address when coordinates are missing
                let address = self.draft.address.clone().unwrap_or_default();
                match self.addresses.forward_geocode(&address).await {
                    Some(at) => {
                        self.draft.coordinates = Some(at);
                        self.draft.location_source = LocationSource::Manual;
                        self.draft.address_edited = false;
                        at
                    }
                    None => {
                        let e = SubmissionError::AddressNotFound(address);
                        self.last_error = Some(e.to_string());
                        return Err(e);
                    }
                }
            }
        };

        self.transition(WorkflowState::Uploading);
        let uploaded = match self.uploaded.clone() {
            Some(uploaded) => uploaded,
            None => match self
                .backend
                .upload_image(&photo, self.draft.owner_id.as_deref())
                .await
            {
                Ok(uploaded) => {
                    self.uploaded = Some(uploaded.clone());
                    uploaded
                }
                Err(e) => return Err(self.fail(format!("Failed to upload photo: {}", e))),
            },
        };

        self.transition(WorkflowState::Persisting);
        let dto = CreateSightingDto {
            owner_id: self.draft.owner_id.clone(),
            image_url: Some(uploaded.image_url),
            thumbnail_url: Some(uploaded.thumbnail_url),
            category: Some(category.as_str().to_string()),
            category_label: Some(category.auto_label()),
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
            location_verified: Some(self.draft.location_source.is_verified()),
            location_source: Some(self.draft.location_source),
            note: Some(self.draft.note.clone()),
        };

        match self.backend.create_sighting(&dto).await {
            Ok(created) => {
                info!("Report {} submitted", created.id);
                self.created_id = Some(created.id);
                self.last_error = None;
                self.transition(WorkflowState::Done);
                Ok(created.id)
            }
            Err(e) => Err(self.fail(format!("Failed to save report: {}", e))),
        }
    }
}
