//! Health-check result popup.

use leptos::prelude::*;

use crate::state::diagnostic::DiagnosticModal as DiagnosticState;

/// Renders the shared diagnostic popup while it is visible. OK or a click on
/// the backdrop dismisses it.
#[component]
pub fn DiagnosticModal(state: RwSignal<DiagnosticState>, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || state.with(|s| s.visible)>
            <div class="dialog-backdrop" on:click=move |_| on_dismiss.run(())>
                <div class="dialog dialog--diagnostic" on:click=move |ev| ev.stop_propagation()>
                    <h3>{move || state.with(|s| s.title.clone())}</h3>
                    // body_html is assembled from escaped values only
                    <div class="dialog__body" inner_html=move || state.with(|s| s.body_html.clone())></div>
                    <div class="dialog__actions">
                        <button class="btn btn--primary" on:click=move |_| on_dismiss.run(())>
                            "OK"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
