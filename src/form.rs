//! Product creation form
//!
//! Owns the draft being edited, the status message, and the field errors
//! returned by the backend. Hosts drive it through [`ProductForm::begin_submit`]
//! and [`ProductForm::finish_submit`] around the actual request; the form
//! itself performs no I/O.

use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::{api::ApiError, products::Category};

/// How long a success message stays visible.
pub const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Stock balance sent with every new product.
pub const DEFAULT_BALANCE: &str = "0";

/// Shown after the backend accepted a product.
pub const SUCCESS_MESSAGE: &str = "Produit ajouté avec succès !";

/// Shown when the backend rejected some fields.
pub const VALIDATION_MESSAGE: &str = "Veuillez corriger les erreurs de validation.";

/// Shown when the backend could not be reached.
pub const NETWORK_MESSAGE: &str =
    "Erreur réseau : Impossible de contacter le serveur. Vérifiez que l'API est lancée.";

/// Form fields, keyed by their multipart names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// `titre`
    Title,

    /// `contenu`
    Description,

    /// `prix`
    Price,

    /// `categorie`
    Category,

    /// `image`
    Image,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::Price,
        FormField::Category,
        FormField::Image,
    ];

    /// Multipart field name, also the key of validation errors.
    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::Title => "titre",
            FormField::Description => "contenu",
            FormField::Price => "prix",
            FormField::Category => "categorie",
            FormField::Image => "image",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Nom du produit",
            FormField::Description => "Description",
            FormField::Price => "Prix",
            FormField::Category => "Catégorie",
            FormField::Image => "Image du produit",
        }
    }
}

/// Per-field validation messages returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Adds a message for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether no field has a message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages for the field with the given wire name.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// First message for `field`, the one shown under the input.
    pub fn first(&self, field: FormField) -> Option<&str> {
        self.messages(field.wire_name()).first().map(String::as_str)
    }

    /// Iterates fields and their messages in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl<F, M> FromIterator<(F, M)> for ValidationErrors
where
    F: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = Self::default();

        for (field, message) in iter {
            errors.push(field, message);
        }

        errors
    }
}

/// Image chosen for upload, forwarded to the backend unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name
    pub file_name: String,

    /// MIME type, when known
    pub content_type: Option<String>,

    /// File contents
    pub bytes: Vec<u8>,
}

/// Values being edited in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    /// Product title
    pub title: String,

    /// Product description
    pub description: String,

    /// Price exactly as typed
    pub price: String,

    /// Selected category
    pub category: Option<Category>,

    /// Selected image
    pub image: Option<ImageUpload>,
}

/// Multipart payload for one product creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// `titre`
    pub title: String,

    /// `contenu`
    pub description: String,

    /// `prix`, unparsed
    pub price: String,

    /// `categorie`, empty when none was selected
    pub category: String,

    /// `image`
    pub image: Option<ImageUpload>,
}

impl NewProduct {
    /// Text parts of the multipart body, in submission order.
    pub fn text_fields(&self) -> [(&'static str, &str); 5] {
        [
            (FormField::Title.wire_name(), self.title.as_str()),
            (FormField::Description.wire_name(), self.description.as_str()),
            (FormField::Price.wire_name(), self.price.as_str()),
            (FormField::Category.wire_name(), self.category.as_str()),
            ("solde", DEFAULT_BALANCE),
        ]
    }
}

impl From<&FormDraft> for NewProduct {
    fn from(draft: &FormDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price.clone(),
            category: draft
                .category
                .map(Category::wire_value)
                .unwrap_or_default()
                .to_string(),
            image: draft.image.clone(),
        }
    }
}

/// Tone of the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The product was created.
    Success,

    /// The submission failed.
    Error,
}

/// Message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Tone
    pub kind: StatusKind,

    /// Text
    pub text: String,
}

impl StatusMessage {
    /// Icon shown before the text.
    pub fn icon(&self) -> &'static str {
        match self.kind {
            StatusKind::Success => "🚀",
            StatusKind::Error => "⚠️",
        }
    }
}

/// Identifies the success message a deferred clear applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTicket(u64);

/// Identifies the image selection a pending file read belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket(u64);

/// Result of a finished submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The product was created; clear the success message with `flash`
    /// once [`FLASH_DURATION`] has passed.
    Created {
        /// Ticket for the deferred clear
        flash: FlashTicket,
    },

    /// The submission failed; the draft is untouched.
    Rejected,

    /// No submission was in flight, so nothing changed.
    Ignored,
}

/// Product creation form state.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    draft: FormDraft,
    status: Option<StatusMessage>,
    errors: ValidationErrors,
    submitting: bool,
    flash_generation: u64,
    image_generation: u64,
    torn_down: bool,
}

impl ProductForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft.
    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    /// Sets the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Sets the raw price text.
    pub fn set_price(&mut self, price: impl Into<String>) {
        self.draft.price = price.into();
    }

    /// Selects a category.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.draft.category = category;
    }

    /// Selects or clears the image. Pending reads started before this
    /// call no longer apply.
    pub fn set_image(&mut self, image: Option<ImageUpload>) {
        self.image_generation = self.image_generation.saturating_add(1);
        self.draft.image = image;
    }

    /// Starts reading a newly chosen file. Only the latest selection's
    /// ticket is accepted by [`ProductForm::finish_image_selection`].
    pub fn begin_image_selection(&mut self) -> ImageTicket {
        self.image_generation = self.image_generation.saturating_add(1);

        ImageTicket(self.image_generation)
    }

    /// Stores the image read for `ticket`.
    ///
    /// Does nothing if a later selection, a successful submission or
    /// teardown superseded it. Returns whether the image was stored.
    pub fn finish_image_selection(&mut self, ticket: ImageTicket, image: ImageUpload) -> bool {
        if self.torn_down || ticket.0 != self.image_generation {
            debug!(file = %image.file_name, "discarding superseded image read");
            return false;
        }

        self.draft.image = Some(image);

        true
    }

    /// Message shown above the form, if any.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Field errors from the last validation rejection.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Message to show under `field`, if any.
    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors.first(field)
    }

    /// Whether a submission is in flight; the submit control is disabled
    /// while this holds.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Label of the submit control.
    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "TRAITEMENT..."
        } else {
            "Ajouter le produit"
        }
    }

    /// Starts a submission and returns the payload to send.
    ///
    /// Returns `None` while another submission is in flight or after
    /// teardown. Every `Some` must be followed by exactly one
    /// [`ProductForm::finish_submit`].
    pub fn begin_submit(&mut self) -> Option<NewProduct> {
        if self.submitting || self.torn_down {
            return None;
        }

        self.status = None;
        self.errors = ValidationErrors::default();
        self.submitting = true;
        self.flash_generation = self.flash_generation.saturating_add(1);

        Some(NewProduct::from(&self.draft))
    }

    /// Records the outcome of the request started by
    /// [`ProductForm::begin_submit`] and re-enables submission.
    ///
    /// Returns [`SubmitOutcome::Ignored`] without touching the form when no
    /// submission is in flight.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> SubmitOutcome {
        if !self.submitting {
            debug!("ignoring a submission result with nothing in flight");
            return SubmitOutcome::Ignored;
        }

        self.submitting = false;

        match result {
            Ok(()) => {
                info!(title = %self.draft.title, "product created");

                self.draft = FormDraft::default();
                self.image_generation = self.image_generation.saturating_add(1);
                self.status = Some(StatusMessage {
                    kind: StatusKind::Success,
                    text: SUCCESS_MESSAGE.to_string(),
                });
                self.flash_generation = self.flash_generation.saturating_add(1);

                SubmitOutcome::Created {
                    flash: FlashTicket(self.flash_generation),
                }
            }
            Err(api_error) => {
                error!(error = %api_error, "failed to create product");

                self.status = Some(StatusMessage {
                    kind: StatusKind::Error,
                    text: submit_failure_message(&api_error),
                });

                if let ApiError::Validation(errors) = api_error {
                    self.errors = errors;
                }

                SubmitOutcome::Rejected
            }
        }
    }

    /// Clears the success message `ticket` was issued for.
    ///
    /// Does nothing if a newer submission replaced the message or the form
    /// was torn down. Returns whether the message was cleared.
    pub fn clear_flash(&mut self, ticket: FlashTicket) -> bool {
        let current = !self.torn_down && ticket.0 == self.flash_generation;
        let is_success = self
            .status
            .as_ref()
            .is_some_and(|status| status.kind == StatusKind::Success);

        if current && is_success {
            self.status = None;
        }

        current && is_success
    }

    /// Marks the form as unmounted; pending clears become no-ops.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.flash_generation = self.flash_generation.saturating_add(1);
    }
}

/// User-facing message for a failed submission.
pub fn submit_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Validation(_) => VALIDATION_MESSAGE.to_string(),
        ApiError::Server {
            status,
            reason,
            message,
        } => {
            let detail = [message, reason]
                .into_iter()
                .flatten()
                .find(|text| !text.is_empty())
                .cloned()
                .unwrap_or_else(|| status.to_string());

            format!("Erreur serveur ({status}): {detail}")
        }
        ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
        ApiError::Request(text) | ApiError::Decode(text) => format!("Erreur : {text}"),
    }
}
