//! Storefront container
//!
//! Wires the catalog and the creation form together. The refresh counter is
//! the only signal between them: a created product bumps it, and a changed
//! token makes the catalog refetch.

use crate::{
    api::ProductsApi,
    catalog::{Catalog, FetchApplied},
    form::{ProductForm, SubmitOutcome},
    refresh::RefreshCounter,
};

/// Catalog, form and refresh counter over one backend.
#[derive(Debug)]
pub struct Storefront<A> {
    api: A,
    catalog: Catalog,
    form: ProductForm,
    refresh: RefreshCounter,
}

impl<A: ProductsApi> Storefront<A> {
    /// Creates a storefront with an empty catalog and form.
    pub fn new(api: A) -> Self {
        Self {
            api,
            catalog: Catalog::new(),
            form: ProductForm::new(),
            refresh: RefreshCounter::new(),
        }
    }

    /// Catalog state.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable catalog state, for search and navigation.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Form state.
    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Mutable form state, for editing the draft.
    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Current refresh token.
    pub fn refresh_token(&self) -> RefreshCounter {
        self.refresh
    }

    /// Fetches the product collection into the catalog.
    pub async fn load_catalog(&mut self) -> FetchApplied {
        let ticket = self.catalog.begin_fetch();
        let result = self.api.list_products().await;

        self.catalog.apply_fetch(ticket, result)
    }

    /// Submits the current draft.
    ///
    /// Returns `None` when a submission is already in flight. After a
    /// successful creation the refresh token advances and the catalog is
    /// refetched.
    pub async fn submit_product(&mut self) -> Option<SubmitOutcome> {
        let product = self.form.begin_submit()?;
        let result = self.api.create_product(product).await;
        let outcome = self.form.finish_submit(result);

        if let SubmitOutcome::Created { .. } = outcome {
            self.product_added().await;
        }

        Some(outcome)
    }

    async fn product_added(&mut self) {
        self.refresh.bump();
        self.load_catalog().await;
    }
}
