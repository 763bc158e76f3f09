use leptos::{ev, html, logging, prelude::*, task};
use storefront::{
    api::ProductsApi,
    form::{
        FLASH_DURATION, FlashTicket, FormDraft, FormField, ProductForm, StatusKind,
        SubmitOutcome,
    },
    products::Category,
};

#[cfg(target_arch = "wasm32")]
use storefront::form::ImageUpload;

use crate::products_api;

const IMAGE_PROMPT: &str = "Glissez-déposez ou cliquez pour sélectionner";

fn image_label(draft: &FormDraft) -> String {
    draft
        .image
        .as_ref()
        .map_or_else(|| IMAGE_PROMPT.to_string(), |image| format!("📸 {}", image.file_name))
}

fn field_class(has_error: bool) -> &'static str {
    if has_error {
        "form-input form-input-invalid"
    } else {
        "form-input"
    }
}

fn status_class(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Success => "form-status form-status-success",
        StatusKind::Error => "form-status form-status-error",
    }
}

fn has_error(form: RwSignal<ProductForm>, field: FormField) -> bool {
    form.with(|form| form.field_error(field).is_some())
}

fn submit(
    form: RwSignal<ProductForm>,
    flash_timer: RwSignal<Option<TimeoutHandle>>,
    file_input: NodeRef<html::Input>,
    on_product_added: Callback<()>,
) {
    let Some(product) = form.try_update(ProductForm::begin_submit).flatten() else {
        return;
    };

    task::spawn_local(async move {
        let result = products_api().create_product(product).await;

        let Some(outcome) = form.try_update(|form| form.finish_submit(result)) else {
            return;
        };

        if let SubmitOutcome::Created { flash } = outcome {
            if let Some(input) = file_input.get_untracked() {
                input.set_value("");
            }

            on_product_added.run(());
            schedule_flash_clear(form, flash_timer, flash);
        }
    });
}

fn schedule_flash_clear(
    form: RwSignal<ProductForm>,
    flash_timer: RwSignal<Option<TimeoutHandle>>,
    flash: FlashTicket,
) {
    if let Some(previous) = flash_timer.try_get_untracked().flatten() {
        previous.clear();
    }

    let handle = set_timeout_with_handle(
        move || {
            form.try_update(|form| form.clear_flash(flash));
        },
        FLASH_DURATION,
    );

    match handle {
        Ok(handle) => {
            if flash_timer.try_set(Some(handle)).is_some() {
                handle.clear();
            }
        }
        Err(error) => logging::warn!("failed to schedule status reset: {error:?}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn select_image(form: RwSignal<ProductForm>, event: &ev::Event) {
    use wasm_bindgen::JsCast;

    let Some(input) = event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
    else {
        return;
    };

    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        form.update(|form| form.set_image(None));
        return;
    };

    let Some(ticket) = form.try_update(ProductForm::begin_image_selection) else {
        return;
    };

    task::spawn_local(async move {
        match read_image(file).await {
            Ok(image) => {
                form.try_update(|form| form.finish_image_selection(ticket, image));
            }
            Err(error) => logging::warn!("{error}"),
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn select_image(_form: RwSignal<ProductForm>, _event: &ev::Event) {}

#[cfg(target_arch = "wasm32")]
async fn read_image(file: web_sys::File) -> Result<ImageUpload, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|error| crate::js_value_message(error, "Failed to read the selected image"))?;

    let content_type = file.type_();

    Ok(ImageUpload {
        file_name: file.name(),
        content_type: (!content_type.is_empty()).then_some(content_type),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
fn FieldError(form: RwSignal<ProductForm>, field: FormField) -> impl IntoView {
    move || {
        form.with(|form| form.field_error(field).map(str::to_string))
            .map_or_else(
                || ().into_any(),
                |message| view! { <div class="field-error">{message}</div> }.into_any(),
            )
    }
}

#[component]
fn StatusBanner(form: RwSignal<ProductForm>) -> impl IntoView {
    move || {
        form.with(|form| form.status().cloned()).map_or_else(
            || ().into_any(),
            |status| {
                let icon = status.icon();

                view! {
                    <div class=status_class(status.kind) role="status">
                        {icon}" "{status.text}
                    </div>
                }
                .into_any()
            },
        )
    }
}

/// Product creation form. Calls `on_product_added` after the backend
/// accepted a product.
#[component]
pub fn ProductCreationForm(
    /// Notified once per created product.
    on_product_added: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(ProductForm::new());
    let flash_timer = RwSignal::new(None::<TimeoutHandle>);
    let file_input = NodeRef::<html::Input>::new();

    on_cleanup(move || {
        form.try_update(ProductForm::teardown);

        if let Some(handle) = flash_timer.try_get_untracked().flatten() {
            handle.clear();
        }
    });

    let on_submit = move |event: ev::SubmitEvent| {
        event.prevent_default();
        submit(form, flash_timer, file_input, on_product_added);
    };

    view! {
        <section class="container creation-section">
            <div class="glass creation-card">
                <div class="creation-heading">
                    <h2>
                        <span class="gradient-text">"Ajouter un produit"</span>
                    </h2>
                    <p>"Ajoutez un nouvel article à la collection EcomSport"</p>
                </div>

                <StatusBanner form=form />

                <form class="creation-form" on:submit=on_submit>
                    <div class="form-field form-field-wide">
                        <label>{FormField::Title.label()}</label>
                        <input
                            type="text"
                            placeholder="Ex: Basket Running Pro"
                            required
                            class=move || field_class(has_error(form, FormField::Title))
                            prop:value=move || form.with(|form| form.draft().title.clone())
                            on:input=move |event| {
                                let value = event_target_value(&event);
                                form.update(|form| form.set_title(value));
                            }
                        />
                        <FieldError form=form field=FormField::Title />
                    </div>

                    <div class="form-field form-field-wide">
                        <label>{FormField::Description.label()}</label>
                        <textarea
                            placeholder="Spécifications techniques, matériaux..."
                            required
                            class=move || field_class(has_error(form, FormField::Description))
                            prop:value=move || form.with(|form| form.draft().description.clone())
                            on:input=move |event| {
                                let value = event_target_value(&event);
                                form.update(|form| form.set_description(value));
                            }
                        ></textarea>
                        <FieldError form=form field=FormField::Description />
                    </div>

                    <div class="form-field">
                        <label>"Prix (€)"</label>
                        <input
                            type="number"
                            step="0.01"
                            placeholder="0.00"
                            required
                            class=move || field_class(has_error(form, FormField::Price))
                            prop:value=move || form.with(|form| form.draft().price.clone())
                            on:input=move |event| {
                                let value = event_target_value(&event);
                                form.update(|form| form.set_price(value));
                            }
                        />
                        <FieldError form=form field=FormField::Price />
                    </div>

                    <div class="form-field">
                        <label>{FormField::Category.label()}</label>
                        <select
                            required
                            class=move || field_class(has_error(form, FormField::Category))
                            prop:value=move || {
                                form.with(|form| {
                                    form.draft().category.map(Category::wire_value).unwrap_or_default()
                                })
                            }
                            on:change=move |event| {
                                let category = event_target_value(&event).parse().ok();
                                form.update(|form| form.set_category(category));
                            }
                        >
                            <option value="" disabled>"Choisir une catégorie"</option>
                            {Category::ALL
                                .into_iter()
                                .map(|category| {
                                    view! {
                                        <option value=category.wire_value()>{category.label()}</option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <FieldError form=form field=FormField::Category />
                    </div>

                    <div class="form-field form-field-wide">
                        <label>{FormField::Image.label()}</label>
                        <div class=move || {
                            if has_error(form, FormField::Image) {
                                "image-drop image-drop-invalid"
                            } else {
                                "image-drop"
                            }
                        }>
                            <label class="btn-primary image-picker">
                                <span>"Choisir une image"</span>
                                <input
                                    type="file"
                                    accept="image/*"
                                    class="visually-hidden"
                                    node_ref=file_input
                                    on:change=move |event| select_image(form, &event)
                                />
                            </label>
                            <span class="image-name">
                                {move || form.with(|form| image_label(form.draft()))}
                            </span>
                        </div>
                        <FieldError form=form field=FormField::Image />
                    </div>

                    <div class="form-field form-field-wide">
                        <button
                            type="submit"
                            class="btn-primary submit-button"
                            disabled=move || form.with(ProductForm::is_submitting)
                        >
                            {move || form.with(ProductForm::submit_label)}
                        </button>
                    </div>
                </form>
            </div>
        </section>
    }
}
