//! Query console page: question form, identifier bar, results and popups.

use std::rc::Rc;

use leptos::prelude::*;

use crate::components::diagnostic_modal::DiagnosticModal;
use crate::components::gate_modal::GateModal;
use crate::console::{Console, ConsoleView};
use crate::net::api::{HEALTH_ENDPOINT, HttpApi};
use crate::state::diagnostic::DiagnosticModal as DiagnosticState;
use crate::util::labels::IDENTIFIER_NOT_SET;
use crate::util::storage::BrowserStorage;

#[cfg(feature = "csr")]
const FLASH_MS: u32 = 3000;

/// Canned questions offered under the form.
const EXAMPLE_QUERIES: &[&str] = &[
    "Покажи мои задачи",
    "Какие задачи в статусе в процессе?",
    "Задачи с высоким приоритетом",
    "Задачи, созданные в марте 2024",
];

/// [`ConsoleView`] over page signals.
#[derive(Clone, Copy)]
struct SignalView {
    identifier_label: RwSignal<String>,
    hidden_user_id: RwSignal<String>,
    submit_enabled: RwSignal<bool>,
    submit_label: RwSignal<String>,
    gate_open: RwSignal<bool>,
    gate_input: RwSignal<String>,
    flash: RwSignal<Option<String>>,
    flash_seq: RwSignal<u64>,
    question: RwSignal<String>,
    result_html: RwSignal<String>,
    result_visible: RwSignal<bool>,
    diagnostic: RwSignal<DiagnosticState>,
}

impl SignalView {
    fn new() -> Self {
        Self {
            identifier_label: RwSignal::new(IDENTIFIER_NOT_SET.to_owned()),
            hidden_user_id: RwSignal::new(String::new()),
            submit_enabled: RwSignal::new(false),
            submit_label: RwSignal::new(String::new()),
            gate_open: RwSignal::new(false),
            gate_input: RwSignal::new(String::new()),
            flash: RwSignal::new(None),
            flash_seq: RwSignal::new(0),
            question: RwSignal::new(String::new()),
            result_html: RwSignal::new(String::new()),
            result_visible: RwSignal::new(false),
            diagnostic: RwSignal::new(DiagnosticState::default()),
        }
    }
}

impl ConsoleView for SignalView {
    fn set_identifier(&self, label: &str, hidden_value: &str) {
        self.identifier_label.set(label.to_owned());
        self.hidden_user_id.set(hidden_value.to_owned());
    }

    fn set_submit(&self, enabled: bool, label: &str) {
        self.submit_enabled.set(enabled);
        self.submit_label.set(label.to_owned());
    }

    fn submit_label(&self) -> String {
        self.submit_label.get_untracked()
    }

    fn open_gate(&self, prefill: &str) {
        self.gate_input.set(prefill.to_owned());
        self.gate_open.set(true);
    }

    fn close_gate(&self) {
        self.gate_open.set(false);
    }

    fn notify(&self, message: &str) {
        log::warn!("{message}");
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
    }

    fn flash(&self, message: &str) {
        self.flash_seq.update(|seq| *seq += 1);
        self.flash.set(Some(message.to_owned()));

        #[cfg(feature = "csr")]
        {
            let seq = self.flash_seq.get_untracked();
            let flash = self.flash;
            let flash_seq = self.flash_seq;
            leptos::task::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(FLASH_MS).await;
                // a newer banner owns the slot
                if flash_seq.get_untracked() == seq {
                    flash.set(None);
                }
            });
        }
    }

    fn set_question(&self, question: &str) {
        self.question.set(question.to_owned());
    }

    fn set_result(&self, html: &str, visible: bool) {
        self.result_html.set(html.to_owned());
        self.result_visible.set(visible);
    }

    fn render_diagnostic(&self, modal: &DiagnosticState) {
        self.diagnostic.set(modal.clone());
    }
}

type PageConsole = Console<BrowserStorage, HttpApi, SignalView>;

#[component]
pub fn ConsolePage() -> impl IntoView {
    let signals = SignalView::new();
    let console: Rc<PageConsole> = Rc::new(Console::new(BrowserStorage, HttpApi, signals));
    console.refresh_ui();
    let console = StoredValue::new_local(console);

    let on_save = Callback::new(move |()| {
        let raw = signals.gate_input.get_untracked();
        console.with_value(|c| {
            let _ = c.on_save_identifier(&raw);
        });
    });

    let on_change = move |_| console.with_value(|c| c.on_change_identifier());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let question = signals.question.get_untracked();

        #[cfg(feature = "csr")]
        {
            let console = console.get_value();
            leptos::task::spawn_local(async move {
                let outcome = console.on_submit(&question).await;
                log::debug!("submit finished: {outcome:?}");
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = question;
        }
    };

    let on_health = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();

        #[cfg(feature = "csr")]
        {
            let console = console.get_value();
            leptos::task::spawn_local(async move {
                console.on_diagnostic_click().await;
            });
        }
    };

    let on_dismiss = Callback::new(move |()| console.with_value(|c| c.on_diagnostic_dismiss()));

    view! {
        <div class="container">
            <header class="console-header">
                <h1>"RAG SQL: задачи на естественном языке"</h1>
                <a href=HEALTH_ENDPOINT class="console-header__health" on:click=on_health>
                    "Health Check"
                </a>
            </header>

            <div class="user-bar">
                <span>"Текущий User ID: "</span>
                <strong>{move || signals.identifier_label.get()}</strong>
                <button class="btn btn--small" on:click=on_change>
                    "Изменить"
                </button>
            </div>

            <div class="test-form">
                <Show when=move || signals.flash.with(Option::is_some)>
                    <div class="success">{move || signals.flash.get().unwrap_or_default()}</div>
                </Show>
                <form on:submit=on_submit>
                    <input type="hidden" name="user_id" prop:value=move || signals.hidden_user_id.get()/>
                    <label class="form-label" for="question">
                        "Ваш вопрос"
                    </label>
                    <textarea
                        id="question"
                        name="question"
                        class="form-textarea"
                        placeholder="Например: покажи мои задачи в процессе"
                        required=true
                        prop:value=move || signals.question.get()
                        on:input=move |ev| signals.question.set(event_target_value(&ev))
                    ></textarea>
                    <div class="query-examples">
                        {EXAMPLE_QUERIES
                            .iter()
                            .map(|query| {
                                view! {
                                    <button
                                        type="button"
                                        class="query-example"
                                        on:click=move |_| console.with_value(|c| c.on_example(query))
                                    >
                                        {*query}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <button
                        type="submit"
                        class="btn btn--primary"
                        disabled=move || !signals.submit_enabled.get()
                    >
                        {move || signals.submit_label.get()}
                    </button>
                </form>
            </div>

            <Show when=move || signals.result_visible.get()>
                <section class="response-section">
                    <h3>"Результат"</h3>
                    <div class="response-content" inner_html=move || signals.result_html.get()></div>
                </section>
            </Show>
        </div>

        <Show when=move || signals.gate_open.get()>
            <GateModal value=signals.gate_input on_save=on_save/>
        </Show>
        <DiagnosticModal state=signals.diagnostic on_dismiss=on_dismiss/>
    }
}
