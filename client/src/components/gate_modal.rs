//! Blocking modal that collects the user identifier.

use leptos::prelude::*;

/// Identifier entry dialog. Enter in the input saves; there is no cancel, the
/// console stays gated until a value is saved.
#[component]
pub fn GateModal(value: RwSignal<String>, on_save: Callback<()>) -> impl IntoView {
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            on_save.run(());
        }
    };

    view! {
        <div class="dialog-backdrop">
            <div class="dialog dialog--gate">
                <h3>"Введите ваш User ID"</h3>
                <label class="dialog__label">
                    "User ID"
                    <input
                        class="dialog__input"
                        type="text"
                        placeholder="например, 1"
                        prop:value=move || value.get()
                        on:input=move |ev| value.set(event_target_value(&ev))
                        on:keydown=on_keydown
                        autofocus=true
                    />
                </label>
                <div class="dialog__actions">
                    <button class="btn btn--primary" on:click=move |_| on_save.run(())>
                        "Сохранить"
                    </button>
                </div>
            </div>
        </div>
    }
}
