use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

mod api;
mod chat;
mod ledger;
mod model;
mod receipt;
mod session;
mod submit;
mod summary;
mod tabs;

use api::ApiError;
use chat::{Conversation, Speaker};
use ledger::{Ledger, LedgerAction};
use model::{Expense, ExpenseDraft, Flag, CATEGORIES};
use receipt::ReceiptForm;
use session::Session;
use submit::Submission;
use summary::summarize;
use tabs::{Tab, TabState};

fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as i64;
    format!("{}₹{}.{:02}", sign, format_with_commas(cents / 100), cents % 100)
}

fn confirm_dialog(message: &str) -> bool {
    web_sys::window()
        .map(|window| window.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

fn alert_dialog(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Issues a ledger refresh tagged with a fresh sequence number. The
/// reducer discards any completion that a newer refresh has overtaken.
fn refresh_ledger(
    ledger: UseReducerHandle<Ledger>,
    session: UseStateHandle<Session>,
    banner: UseStateHandle<Option<String>>,
) {
    let Some(token) = session.token().map(str::to_owned) else {
        ledger.dispatch(LedgerAction::Reset);
        return;
    };

    let seq = ledger::next_refresh_seq();
    ledger.dispatch(LedgerAction::Begin { seq });

    spawn_local(async move {
        let outcome = api::list_expenses(&token).await;
        if let Err(error) = &outcome {
            banner.set(Some(error.to_string()));
            drop_session_on_auth_failure(&session, error);
        }
        ledger.dispatch(LedgerAction::Complete { seq, outcome });
    });
}

fn drop_session_on_auth_failure(session: &UseStateHandle<Session>, error: &ApiError) {
    let mut next = (**session).clone();
    if next.absorb_failure(error) {
        session::forget_token();
        session.set(next);
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    on_logout: Callback<MouseEvent>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="bg-[#1a365d] text-white h-16 flex items-center justify-between px-6 shadow-md sticky top-0 z-20">
            <div class="flex items-center gap-3">
                <span class="text-emerald-400">{ icon_wallet() }</span>
                <div>
                    <h1 class="text-xl font-bold leading-tight">{"Brokemate"}</h1>
                    <p class="text-xs text-slate-300">{"Personal Expense Manager"}</p>
                </div>
            </div>
            <button onclick={props.on_logout.clone()} class="flex items-center gap-2 px-4 py-2 bg-red-600 hover:bg-red-700 rounded-lg text-sm font-medium transition-colors">
                { icon_log_out() }
                <span>{"Logout"}</span>
            </button>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct BannerProps {
    message: Option<String>,
    on_clear: Callback<MouseEvent>,
}

#[function_component(Banner)]
fn banner(props: &BannerProps) -> Html {
    let Some(message) = &props.message else {
        return html! {};
    };

    html! {
        <div class="bg-red-50 border border-red-400 text-red-700 px-4 py-3 rounded-lg relative my-4" role="alert">
            <strong class="font-bold">{"Error: "}</strong>
            <span class="whitespace-pre-wrap">{ message.clone() }</span>
            <button class="absolute top-3 right-4" onclick={props.on_clear.clone()}>
                { icon_x() }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ModalProps {
    title: &'static str,
    on_close: Callback<MouseEvent>,
    children: Children,
}

#[function_component(Modal)]
fn modal(props: &ModalProps) -> Html {
    html! {
        <div class="fixed inset-0 bg-black/70 flex items-center justify-center z-50 p-4">
            <div class="bg-white rounded-2xl shadow-2xl p-6 w-full max-w-lg border border-slate-200">
                <div class="flex justify-between items-center mb-4">
                    <h2 class="text-2xl font-bold text-slate-800">{ props.title }</h2>
                    <button onclick={props.on_close.clone()} class="text-slate-500 hover:text-slate-700">
                        { icon_x() }
                    </button>
                </div>
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ExpenseFormProps {
    #[prop_or_default]
    expense: Option<Expense>,
    busy: bool,
    on_submit: Callback<ExpenseDraft>,
    on_cancel: Callback<MouseEvent>,
}

#[function_component(ExpenseFormFields)]
fn expense_form_fields(props: &ExpenseFormProps) -> Html {
    let amount = use_state(|| {
        props
            .expense
            .as_ref()
            .map(|e| e.amount.to_string())
            .unwrap_or_default()
    });
    let category = use_state(|| {
        props
            .expense
            .as_ref()
            .map(|e| e.category.clone())
            .unwrap_or_default()
    });
    let description = use_state(|| {
        props
            .expense
            .as_ref()
            .map(|e| e.description_text().to_string())
            .unwrap_or_default()
    });
    let date = use_state(|| {
        props
            .expense
            .as_ref()
            .map(|e| e.date.clone())
            .unwrap_or_default()
    });
    let form_error = use_state(|| None::<String>);

    let on_save = {
        let amount = amount.clone();
        let category = category.clone();
        let description = description.clone();
        let date = date.clone();
        let form_error = form_error.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |_: MouseEvent| {
            match ExpenseDraft::parse(&amount, &category, &description, &date) {
                Ok(draft) => {
                    form_error.set(None);
                    on_submit.emit(draft);
                }
                Err(message) => form_error.set(Some(message)),
            }
        })
    };

    html! {
        <div class="flex flex-col gap-4">
            <div class="space-y-1">
                <label class="block text-sm font-medium text-slate-700">{"Amount (₹)"}</label>
                <input type="number" step="0.01" value={(*amount).clone()} oninput={{
                    let amount = amount.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        amount.set(input.value());
                    })
                }} class="w-full bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500" />
            </div>
            <div class="space-y-1">
                <label class="block text-sm font-medium text-slate-700">{"Category"}</label>
                <select onchange={{
                    let category = category.clone();
                    Callback::from(move |e: Event| {
                        let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
                        category.set(select.value());
                    })
                }} class="w-full bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500">
                    <option value="" selected={category.is_empty()}>{"Select a category"}</option>
                    { for CATEGORIES.iter().map(|name| html! {
                        <option value={*name} selected={*category == *name}>{ *name }</option>
                    }) }
                </select>
            </div>
            <div class="space-y-1">
                <label class="block text-sm font-medium text-slate-700">{"Description"}</label>
                <input type="text" value={(*description).clone()} oninput={{
                    let description = description.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        description.set(input.value());
                    })
                }} class="w-full bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500" />
            </div>
            <div class="space-y-1">
                <label class="block text-sm font-medium text-slate-700">{"Date"}</label>
                <input type="date" value={(*date).clone()} oninput={{
                    let date = date.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        date.set(input.value());
                    })
                }} class="w-full bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500" />
            </div>
            {
                if let Some(message) = &*form_error {
                    html! { <p class="text-sm text-red-500">{ message.clone() }</p> }
                } else {
                    html! {}
                }
            }
            <div class="flex justify-end gap-3 pt-1">
                <button onclick={props.on_cancel.clone()} class="px-4 py-2 bg-slate-500 hover:bg-slate-400 text-white rounded-lg transition-colors">
                    {"Cancel"}
                </button>
                <button onclick={on_save} disabled={props.busy} class="px-4 py-2 bg-emerald-500 hover:bg-emerald-600 disabled:bg-slate-400 text-white rounded-lg transition-colors">
                    { if props.busy { "Saving..." } else { "Save Expense" } }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct OverviewProps {
    expenses: Vec<Expense>,
}

#[function_component(OverviewView)]
fn overview_view(props: &OverviewProps) -> Html {
    let summary = summarize(&props.expenses);

    html! {
        <div class="flex flex-col gap-6">
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6 text-center">
                <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200">
                    <h3 class="text-slate-600 text-lg">{"Total Expenses"}</h3>
                    <p class="text-3xl font-bold text-emerald-500 mt-2">{ format_inr(summary.total) }</p>
                </div>
                <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200">
                    <h3 class="text-slate-600 text-lg">{"Total Transactions"}</h3>
                    <p class="text-3xl font-bold text-[#1a365d] mt-2">{ summary.count }</p>
                </div>
                <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200">
                    <h3 class="text-slate-600 text-lg">{"Average Expense"}</h3>
                    <p class="text-3xl font-bold text-amber-500 mt-2">{ format_inr(summary.average) }</p>
                </div>
            </div>
            <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200">
                <h2 class="text-xl font-bold text-slate-800 mb-4">{"Category Distribution"}</h2>
                {
                    if summary.by_category.is_empty() {
                        html! { <p class="text-center text-slate-500">{"No expense data to display charts."}</p> }
                    } else {
                        let grand_total = summary.total;
                        html! {
                            <div class="space-y-3">
                                { for summary.by_category.iter().map(|(name, value)| {
                                    let percent = if grand_total != 0.0 { (value / grand_total * 100.0).round() as i64 } else { 0 };
                                    html! {
                                        <div class="flex flex-col gap-1 text-sm">
                                            <div class="flex items-center justify-between">
                                                <span class="text-slate-800">{ name.clone() }</span>
                                                <span class="font-semibold text-slate-600">{ format!("{} ({}%)", format_inr(*value), percent) }</span>
                                            </div>
                                            <div class="h-2 w-full bg-slate-100 rounded-full overflow-hidden">
                                                <div class="h-full bg-emerald-500" style={format!("width: {}%", percent.clamp(0, 100))}></div>
                                            </div>
                                        </div>
                                    }
                                }) }
                            </div>
                        }
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ExpensesViewProps {
    expenses: Vec<Expense>,
    token: String,
    on_mutated: Callback<()>,
    on_api_error: Callback<ApiError>,
}

#[function_component(ExpensesView)]
fn expenses_view(props: &ExpensesViewProps) -> Html {
    let editing = use_state(|| None::<Expense>);
    let edit_gate = use_state(Submission::default);
    let removal = use_state(Submission::default);
    let flagging = use_state(Submission::default);

    let close_editor = {
        let editing = editing.clone();
        let edit_gate = edit_gate.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            edit_gate.set(Submission::default());
        })
    };

    let on_edit_submit = {
        let editing = editing.clone();
        let edit_gate = edit_gate.clone();
        let token = props.token.clone();
        let on_mutated = props.on_mutated.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |draft: ExpenseDraft| {
            let Some(expense) = (*editing).clone() else {
                return;
            };
            let mut gate = (*edit_gate).clone();
            if !gate.begin() {
                return;
            }
            edit_gate.set(gate.clone());

            let token = token.clone();
            let editing = editing.clone();
            let edit_gate = edit_gate.clone();
            let on_mutated = on_mutated.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                match api::edit_expense(&token, expense.id, &draft).await {
                    Ok(()) => {
                        let mut done = gate;
                        done.done();
                        edit_gate.set(done);
                        editing.set(None);
                        on_mutated.emit(());
                    }
                    Err(error) => {
                        on_api_error.emit(error.clone());
                        let mut failed = gate;
                        failed.fail(error.to_string());
                        edit_gate.set(failed);
                    }
                }
            });
        })
    };

    let on_delete = {
        let removal = removal.clone();
        let token = props.token.clone();
        let on_mutated = props.on_mutated.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |id: i64| {
            if !confirm_dialog("Are you sure you want to delete this expense?") {
                return;
            }
            let mut gate = (*removal).clone();
            if !gate.begin() {
                return;
            }
            removal.set(gate.clone());

            let token = token.clone();
            let removal = removal.clone();
            let on_mutated = on_mutated.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                match api::delete_expense(&token, id).await {
                    Ok(()) => {
                        let mut done = gate;
                        done.done();
                        removal.set(done);
                        on_mutated.emit(());
                    }
                    Err(error) => {
                        on_api_error.emit(error.clone());
                        alert_dialog(&format!("Error: {error}"));
                        let mut done = gate;
                        done.done();
                        removal.set(done);
                    }
                }
            });
        })
    };

    let on_flag = {
        let flagging = flagging.clone();
        let token = props.token.clone();
        let on_mutated = props.on_mutated.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |(id, flag): (i64, Flag)| {
            let mut gate = (*flagging).clone();
            if !gate.begin() {
                return;
            }
            flagging.set(gate.clone());

            let token = token.clone();
            let flagging = flagging.clone();
            let on_mutated = on_mutated.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                match api::flag_expense(&token, id, flag).await {
                    Ok(()) => {
                        let mut done = gate;
                        done.done();
                        flagging.set(done);
                        on_mutated.emit(());
                    }
                    Err(error) => {
                        on_api_error.emit(error.clone());
                        alert_dialog(&format!("Error: {error}"));
                        let mut done = gate;
                        done.done();
                        flagging.set(done);
                    }
                }
            });
        })
    };

    html! {
        <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200">
            <h2 class="text-2xl font-bold text-slate-800 mb-4">{"All Expenses"}</h2>
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="border-b border-slate-300 text-slate-700 text-sm">
                            <th class="px-3 py-3 font-semibold">{"Date"}</th>
                            <th class="px-3 py-3 font-semibold">{"Amount"}</th>
                            <th class="px-3 py-3 font-semibold">{"Category"}</th>
                            <th class="px-3 py-3 font-semibold">{"Description"}</th>
                            <th class="px-3 py-3 font-semibold">{"Flag"}</th>
                            <th class="px-3 py-3 font-semibold">{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for props.expenses.iter().map(|expense| {
                            let id = expense.id;
                            let flag_up = {
                                let on_flag = on_flag.clone();
                                Callback::from(move |_: MouseEvent| on_flag.emit((id, Flag::Green)))
                            };
                            let flag_down = {
                                let on_flag = on_flag.clone();
                                Callback::from(move |_: MouseEvent| on_flag.emit((id, Flag::Red)))
                            };
                            let edit = {
                                let editing = editing.clone();
                                let expense = expense.clone();
                                Callback::from(move |_: MouseEvent| editing.set(Some(expense.clone())))
                            };
                            let delete = {
                                let on_delete = on_delete.clone();
                                Callback::from(move |_: MouseEvent| on_delete.emit(id))
                            };

                            html! {
                                <tr key={id.to_string()} class="border-b border-slate-200 text-sm hover:bg-slate-50">
                                    <td class="px-3 py-3 text-slate-600">{ expense.date.clone() }</td>
                                    <td class="px-3 py-3 font-semibold text-emerald-600">{ format_inr(expense.amount) }</td>
                                    <td class="px-3 py-3">
                                        <span class="bg-slate-100 text-slate-700 px-3 py-1 rounded-full text-xs font-bold">{ expense.category.clone() }</span>
                                    </td>
                                    <td class="px-3 py-3 text-slate-600">{ expense.description_text().to_string() }</td>
                                    <td class="px-3 py-3">
                                        <div class="flex gap-2">
                                            {
                                                if expense.flag == Some(Flag::Green) {
                                                    html! { <span class="text-emerald-500">{ icon_thumbs_up() }</span> }
                                                } else {
                                                    html! {
                                                        <button onclick={flag_up} disabled={flagging.busy()} class="text-slate-400 hover:text-emerald-500">
                                                            { icon_thumbs_up() }
                                                        </button>
                                                    }
                                                }
                                            }
                                            {
                                                if expense.flag == Some(Flag::Red) {
                                                    html! { <span class="text-red-500">{ icon_thumbs_down() }</span> }
                                                } else {
                                                    html! {
                                                        <button onclick={flag_down} disabled={flagging.busy()} class="text-slate-400 hover:text-red-500">
                                                            { icon_thumbs_down() }
                                                        </button>
                                                    }
                                                }
                                            }
                                        </div>
                                    </td>
                                    <td class="px-3 py-3">
                                        <div class="flex gap-3">
                                            <button onclick={edit} class="text-blue-600 hover:text-blue-800">{ icon_pencil() }</button>
                                            <button onclick={delete} disabled={removal.busy()} class="text-red-500 hover:text-red-700">{ icon_trash() }</button>
                                        </div>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
                {
                    if props.expenses.is_empty() {
                        html! { <p class="text-center text-slate-500 py-8">{"No expenses recorded yet."}</p> }
                    } else {
                        html! {}
                    }
                }
            </div>
            {
                if let Some(expense) = &*editing {
                    html! {
                        <Modal title="Edit Expense" on_close={close_editor.clone()}>
                            {
                                if let Some(message) = edit_gate.error() {
                                    html! {
                                        <div class="bg-red-50 border border-red-400 text-red-700 px-4 py-3 rounded-lg mb-4" role="alert">
                                            <strong class="font-bold">{"Error: "}</strong>
                                            <span>{ message.to_string() }</span>
                                        </div>
                                    }
                                } else {
                                    html! {}
                                }
                            }
                            <ExpenseFormFields
                                expense={Some(expense.clone())}
                                busy={edit_gate.busy()}
                                on_submit={on_edit_submit.clone()}
                                on_cancel={close_editor.clone()}
                            />
                        </Modal>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AnalysisViewProps {
    token: String,
    on_api_error: Callback<ApiError>,
}

#[function_component(AnalysisView)]
fn analysis_view(props: &AnalysisViewProps) -> Html {
    let analysis = use_state(|| None::<String>);
    let gate = use_state(Submission::default);

    let on_analyze = {
        let analysis = analysis.clone();
        let gate = gate.clone();
        let token = props.token.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*gate).clone();
            if !next.begin() {
                return;
            }
            gate.set(next.clone());
            analysis.set(None);

            let token = token.clone();
            let analysis = analysis.clone();
            let gate = gate.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                match api::analyze(&token).await {
                    Ok(report) => {
                        analysis.set(Some(report));
                        let mut done = next;
                        done.done();
                        gate.set(done);
                    }
                    Err(error) => {
                        on_api_error.emit(error.clone());
                        let mut failed = next;
                        failed.fail(error.to_string());
                        gate.set(failed);
                    }
                }
            });
        })
    };

    html! {
        <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200 text-center">
            <span class="inline-block text-emerald-500 mb-4">{ icon_brain() }</span>
            <h2 class="text-2xl font-bold text-slate-800 mb-2">{"AI Expense Analysis"}</h2>
            <p class="text-slate-600 mb-6">{"Get personalized insights and tips on your spending habits."}</p>
            <button onclick={on_analyze} disabled={gate.busy()} class="bg-emerald-500 hover:bg-emerald-600 disabled:bg-slate-400 text-white font-bold px-6 py-3 rounded-lg transition-colors">
                { if gate.busy() { "Analyzing..." } else { "Analyze My Expenses" } }
            </button>
            {
                if let Some(message) = gate.error() {
                    html! {
                        <div class="bg-red-50 border border-red-400 text-red-700 px-4 py-3 rounded-lg mt-4 text-left" role="alert">
                            <strong class="font-bold">{"Error: "}</strong>
                            <span>{ message.to_string() }</span>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(report) = &*analysis {
                    html! {
                        <div class="mt-6 p-4 bg-slate-100 rounded-lg text-left whitespace-pre-wrap text-slate-800">
                            { report.clone() }
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ChatViewProps {
    token: String,
    on_api_error: Callback<ApiError>,
}

#[function_component(ChatView)]
fn chat_view(props: &ChatViewProps) -> Html {
    let conversation = use_state(Conversation::new);
    let input = use_state(String::new);

    let send = {
        let conversation = conversation.clone();
        let input = input.clone();
        let token = props.token.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |_: ()| {
            let mut convo = (*conversation).clone();
            let Some(query) = convo.begin(&input) else {
                return;
            };
            conversation.set(convo.clone());
            input.set(String::new());

            let token = token.clone();
            let conversation = conversation.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                let outcome = api::chat(&token, &query).await;
                if let Err(error) = &outcome {
                    on_api_error.emit(error.clone());
                }
                let mut done = convo;
                done.finish(outcome);
                conversation.set(done);
            });
        })
    };

    let on_send_click = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };
    let on_keypress = {
        let send = send.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                send.emit(());
            }
        })
    };

    html! {
        <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200 flex flex-col h-[70vh]">
            <h2 class="text-2xl font-bold text-slate-800 mb-4">{"Chat with Brokebot"}</h2>
            <div class="flex-1 overflow-y-auto pr-2 flex flex-col gap-4">
                { for conversation.entries().iter().enumerate().map(|(idx, entry)| {
                    let from_assistant = entry.speaker == Speaker::Assistant;
                    let row_class = if from_assistant { "flex justify-start" } else { "flex justify-end" };
                    let bubble_class = if from_assistant {
                        "max-w-lg p-3 rounded-lg bg-slate-200 text-slate-800 whitespace-pre-wrap break-words"
                    } else {
                        "max-w-lg p-3 rounded-lg bg-emerald-500 text-white whitespace-pre-wrap break-words"
                    };
                    html! {
                        <div key={idx} class={row_class}>
                            <div class={bubble_class}>{ entry.text.clone() }</div>
                        </div>
                    }
                }) }
                {
                    if conversation.busy() {
                        html! {
                            <div class="flex justify-start">
                                <div class="p-3 rounded-lg bg-slate-200 text-slate-500">{"..."}</div>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
            <div class="mt-4 flex gap-2">
                <input type="text" value={(*input).clone()} placeholder="Ask about your spending..." oninput={{
                    let input = input.clone();
                    Callback::from(move |e: InputEvent| {
                        let field: web_sys::HtmlInputElement = e.target_unchecked_into();
                        input.set(field.value());
                    })
                }} onkeypress={on_keypress} class="flex-1 bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500" />
                <button onclick={on_send_click} disabled={conversation.busy()} class="bg-emerald-500 hover:bg-emerald-600 disabled:bg-slate-400 text-white p-3 rounded-lg transition-colors">
                    { icon_send() }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ReceiptViewProps {
    token: String,
    on_mutated: Callback<()>,
    on_api_error: Callback<ApiError>,
}

#[function_component(ReceiptView)]
fn receipt_view(props: &ReceiptViewProps) -> Html {
    let form = use_state(ReceiptForm::default);
    let file = use_state(|| None::<web_sys::File>);
    let file_input = use_node_ref();

    let on_file_change = {
        let form = form.clone();
        let file = file.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let selected = input.files().and_then(|list| list.get(0));
            let mut next = (*form).clone();
            match selected {
                Some(picked) if picked.type_().starts_with("image/") => {
                    next.accept_file();
                    file.set(Some(picked));
                }
                Some(_) => {
                    next.reject_file();
                    file.set(None);
                    input.set_value("");
                }
                None => {}
            }
            form.set(next);
        })
    };

    let on_description = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set_description(input.value());
            form.set(next);
        })
    };

    let on_upload = {
        let form = form.clone();
        let file = file.clone();
        let file_input = file_input.clone();
        let token = props.token.clone();
        let on_mutated = props.on_mutated.clone();
        let on_api_error = props.on_api_error.clone();
        Callback::from(move |_: MouseEvent| {
            let picked = (*file).clone();
            let mut next = (*form).clone();
            if !next.begin(picked.is_some()) {
                form.set(next);
                return;
            }
            form.set(next.clone());

            let Some(picked) = picked else {
                return;
            };
            let description = next.description.clone();
            let token = token.clone();
            let form = form.clone();
            let file = file.clone();
            let file_input = file_input.clone();
            let on_mutated = on_mutated.clone();
            let on_api_error = on_api_error.clone();
            spawn_local(async move {
                let outcome = api::process_receipt(&token, &picked, &description).await;
                if let Err(error) = &outcome {
                    on_api_error.emit(error.clone());
                }
                let mut done = next;
                if done.finish(outcome) {
                    file.set(None);
                    if let Some(input) = file_input.cast::<web_sys::HtmlInputElement>() {
                        input.set_value("");
                    }
                    on_mutated.emit(());
                }
                form.set(done);
            });
        })
    };

    let file_name = file.as_ref().map(|picked| picked.name());

    html! {
        <div class="bg-white rounded-2xl p-6 shadow-md border border-slate-200 text-center">
            <h2 class="text-2xl font-bold text-slate-800 mb-2">{"Receipt Scanner"}</h2>
            <p class="text-slate-600 mb-6">{"Upload a receipt image to automatically extract and categorize expenses"}</p>

            <div class="flex flex-col gap-4 max-w-md mx-auto text-left">
                <div class="space-y-1">
                    <label class="block text-sm font-medium text-slate-700">{"Receipt Description"}</label>
                    <input type="text" value={form.description.clone()} placeholder="e.g., Grocery shopping, Restaurant bill" oninput={on_description}
                        class="w-full bg-white border border-slate-300 rounded-lg p-3 text-slate-800 outline-none focus:border-emerald-500" />
                </div>
                <div class="space-y-1">
                    <label class="block text-sm font-medium text-slate-700">{"Receipt Image"}</label>
                    <input ref={file_input} type="file" accept="image/*" onchange={on_file_change}
                        class="w-full p-3 border-2 border-dashed border-slate-300 rounded-lg cursor-pointer" />
                    {
                        if let Some(name) = file_name {
                            html! { <p class="text-sm text-emerald-600 mt-1">{ format!("Selected: {name}") }</p> }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <button onclick={on_upload} disabled={form.busy() || file.is_none()}
                    class="w-full bg-emerald-500 hover:bg-emerald-600 disabled:bg-slate-400 text-white font-bold px-4 py-3 rounded-lg transition-colors">
                    { if form.busy() { "Processing Receipt..." } else { "Process Receipt" } }
                </button>
            </div>

            {
                if let Some(message) = form.error() {
                    html! {
                        <div class="bg-red-50 border border-red-400 text-red-700 px-4 py-3 rounded-lg mt-4 text-left" role="alert">
                            <strong class="font-bold">{"Error: "}</strong>
                            <span>{ message.to_string() }</span>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            {
                if let Some(message) = form.notice() {
                    html! {
                        <div class="bg-emerald-50 border border-emerald-400 text-emerald-700 px-4 py-3 rounded-lg mt-4 text-left font-medium">
                            { message.to_string() }
                        </div>
                    }
                } else {
                    html! {}
                }
            }

            <div class="mt-6 text-sm text-slate-600">
                <p><strong>{"Supported formats:"}</strong>{" JPG, PNG, WEBP"}</p>
                <p><strong>{"AI-powered:"}</strong>{" Automatically categorizes items"}</p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AuthScreenProps {
    on_login: Callback<String>,
}

#[function_component(AuthScreen)]
fn auth_screen(props: &AuthScreenProps) -> Html {
    let is_login = use_state(|| true);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let gate = use_state(Submission::default);
    let notice = use_state(|| None::<String>);

    let switch_view = {
        let is_login = is_login.clone();
        let gate = gate.clone();
        let notice = notice.clone();
        Callback::from(move |login_view: bool| {
            is_login.set(login_view);
            let mut next = (*gate).clone();
            next.clear_error();
            gate.set(next);
            notice.set(None);
        })
    };

    let on_submit = {
        let is_login = is_login.clone();
        let username = username.clone();
        let password = password.clone();
        let gate = gate.clone();
        let notice = notice.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let username_val = username.trim().to_string();
            let password_val = (*password).clone();
            if username_val.is_empty() || password_val.is_empty() {
                let mut failed = (*gate).clone();
                failed.fail("Username and password are required.");
                gate.set(failed);
                return;
            }

            let mut next = (*gate).clone();
            if !next.begin() {
                return;
            }
            gate.set(next.clone());
            notice.set(None);

            let login_view = *is_login;
            let is_login = is_login.clone();
            let password = password.clone();
            let gate = gate.clone();
            let notice = notice.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                if login_view {
                    match api::login(&username_val, &password_val).await {
                        Ok(token) => {
                            let mut done = next;
                            done.done();
                            gate.set(done);
                            on_login.emit(token);
                        }
                        Err(error) => {
                            let mut failed = next;
                            failed.fail(error.to_string());
                            gate.set(failed);
                        }
                    }
                } else {
                    match api::register(&username_val, &password_val).await {
                        Ok(()) => {
                            let mut done = next;
                            done.done();
                            gate.set(done);
                            notice.set(Some("Registration successful! Please log in.".to_string()));
                            is_login.set(true);
                            password.set(String::new());
                        }
                        Err(error) => {
                            let mut failed = next;
                            failed.fail(error.to_string());
                            gate.set(failed);
                        }
                    }
                }
            });
        })
    };

    html! {
        <div class="min-h-screen flex flex-col items-center justify-center bg-[#1a365d] p-4">
            <div class="w-full max-w-md">
                <div class="flex items-center gap-4 justify-center mb-10 text-white">
                    <span class="text-amber-400">{ icon_wallet() }</span>
                    <div>
                        <h1 class="text-4xl font-bold">{"Brokemate"}</h1>
                        <p class="text-lg text-slate-300 font-light">{"Your Personal Finance Companion"}</p>
                    </div>
                </div>
                <div class="bg-white p-8 rounded-2xl shadow-2xl">
                    <div class="flex border-b border-slate-200 mb-6">
                        <button onclick={{
                            let switch_view = switch_view.clone();
                            Callback::from(move |_| switch_view.emit(true))
                        }} class={if *is_login { "flex-1 py-2 font-semibold text-emerald-600 border-b-2 border-emerald-500" } else { "flex-1 py-2 text-slate-500" }}>
                            {"Login"}
                        </button>
                        <button onclick={{
                            let switch_view = switch_view.clone();
                            Callback::from(move |_| switch_view.emit(false))
                        }} class={if !*is_login { "flex-1 py-2 font-semibold text-emerald-600 border-b-2 border-emerald-500" } else { "flex-1 py-2 text-slate-500" }}>
                            {"Register"}
                        </button>
                    </div>

                    <form class="space-y-4" onsubmit={on_submit}>
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-slate-700">{"Username"}</label>
                            <input type="text" value={(*username).clone()} oninput={{
                                let username = username.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    username.set(input.value());
                                })
                            }} class="w-full px-4 py-3 bg-white border border-slate-300 rounded-lg text-slate-800 outline-none focus:border-emerald-500" />
                        </div>
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-slate-700">{"Password"}</label>
                            <input type="password" value={(*password).clone()} oninput={{
                                let password = password.clone();
                                Callback::from(move |e: InputEvent| {
                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                    password.set(input.value());
                                })
                            }} class="w-full px-4 py-3 bg-white border border-slate-300 rounded-lg text-slate-800 outline-none focus:border-emerald-500" />
                        </div>

                        {
                            if let Some(message) = gate.error() {
                                html! { <p class="text-sm text-red-500">{ message.to_string() }</p> }
                            } else if let Some(message) = &*notice {
                                html! { <p class="text-sm text-emerald-600">{ message.clone() }</p> }
                            } else {
                                html! {}
                            }
                        }

                        <button type="submit" disabled={gate.busy()}
                            class="w-full bg-emerald-500 hover:bg-emerald-600 disabled:bg-slate-400 text-white py-3 rounded-lg font-semibold transition-colors">
                            { if gate.busy() { "Please wait..." } else if *is_login { "Login" } else { "Create Account" } }
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let session = use_state(|| Session::new(session::stored_token()));
    let ledger = use_reducer(Ledger::default);
    let tab_state = use_state(TabState::default);
    let page_error = use_state(|| None::<String>);
    let create_gate = use_state(Submission::default);

    {
        let ledger = ledger.clone();
        let session_handle = session.clone();
        let page_error = page_error.clone();
        use_effect_with_deps(
            move |logged_in: &bool| {
                if *logged_in {
                    refresh_ledger(ledger, session_handle, page_error);
                } else {
                    ledger.dispatch(LedgerAction::Reset);
                }
                || ()
            },
            session.is_logged_in(),
        );
    }

    let on_login = {
        let session = session.clone();
        Callback::from(move |token: String| {
            session::persist_token(&token);
            let mut next = (*session).clone();
            next.log_in(token);
            session.set(next);
        })
    };

    let on_logout = {
        let session = session.clone();
        let tab_state = tab_state.clone();
        let page_error = page_error.clone();
        Callback::from(move |_: MouseEvent| {
            session::forget_token();
            let mut next = (*session).clone();
            next.log_out();
            session.set(next);
            tab_state.set(TabState::default());
            page_error.set(None);
        })
    };

    let Some(token) = session.token().map(str::to_owned) else {
        return html! { <AuthScreen on_login={on_login} /> };
    };

    let on_mutated = {
        let ledger = ledger.clone();
        let session = session.clone();
        let page_error = page_error.clone();
        Callback::from(move |_: ()| {
            refresh_ledger(ledger.clone(), session.clone(), page_error.clone());
        })
    };

    let on_api_error = {
        let session = session.clone();
        Callback::from(move |error: ApiError| {
            drop_session_on_auth_failure(&session, &error);
        })
    };

    let on_select_tab = {
        let tab_state = tab_state.clone();
        Callback::from(move |tab: Tab| {
            let mut next = (*tab_state).clone();
            next.select(tab);
            tab_state.set(next);
        })
    };

    let open_add = {
        let tab_state = tab_state.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*tab_state).clone();
            next.open_add();
            tab_state.set(next);
        })
    };

    let close_add = {
        let tab_state = tab_state.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*tab_state).clone();
            next.close_add();
            tab_state.set(next);
        })
    };

    let on_create = {
        let create_gate = create_gate.clone();
        let tab_state = tab_state.clone();
        let page_error = page_error.clone();
        let ledger = ledger.clone();
        let session = session.clone();
        let token = token.clone();
        Callback::from(move |draft: ExpenseDraft| {
            let mut gate = (*create_gate).clone();
            if !gate.begin() {
                return;
            }
            create_gate.set(gate.clone());

            let token = token.clone();
            let create_gate = create_gate.clone();
            let tab_state = tab_state.clone();
            let page_error = page_error.clone();
            let ledger = ledger.clone();
            let session = session.clone();
            spawn_local(async move {
                match api::add_expense(&token, &draft).await {
                    Ok(()) => {
                        let mut done = gate;
                        done.done();
                        create_gate.set(done);
                        let mut next = (*tab_state).clone();
                        next.close_add();
                        tab_state.set(next);
                        refresh_ledger(ledger, session, page_error);
                    }
                    Err(error) => {
                        drop_session_on_auth_failure(&session, &error);
                        page_error.set(Some(error.to_string()));
                        let mut done = gate;
                        done.done();
                        create_gate.set(done);
                    }
                }
            });
        })
    };

    let clear_banner = {
        let page_error = page_error.clone();
        Callback::from(move |_: MouseEvent| page_error.set(None))
    };

    let records = ledger.records().to_vec();
    let content = if ledger.is_loading() && !ledger.loaded_once() && tab_state.active() != Tab::Expenses {
        html! {
            <div class="flex justify-center items-center p-12 text-slate-500">{"Loading..."}</div>
        }
    } else {
        match tab_state.active() {
            Tab::Overview => html! { <OverviewView expenses={records} /> },
            Tab::Expenses => html! {
                <ExpensesView
                    expenses={records}
                    token={token.clone()}
                    on_mutated={on_mutated.clone()}
                    on_api_error={on_api_error.clone()}
                />
            },
            Tab::Receipt => html! {
                <ReceiptView
                    token={token.clone()}
                    on_mutated={on_mutated.clone()}
                    on_api_error={on_api_error.clone()}
                />
            },
            Tab::Analysis => html! {
                <AnalysisView token={token.clone()} on_api_error={on_api_error.clone()} />
            },
            Tab::Chat => html! {
                <ChatView token={token.clone()} on_api_error={on_api_error.clone()} />
            },
        }
    };

    html! {
        <div class="min-h-screen bg-slate-100 text-slate-800">
            <Header on_logout={on_logout} />
            <main class="p-8 max-w-6xl mx-auto">
                <div class="bg-white p-4 rounded-2xl flex items-center gap-3 mb-8 shadow-md">
                    <div class="flex-1 flex gap-2">
                        { for Tab::ALL.iter().map(|tab| {
                            let tab = *tab;
                            let is_active = tab_state.active() == tab;
                            let on_select_tab = on_select_tab.clone();
                            let class_name = if is_active {
                                "flex-1 flex items-center justify-center gap-2 px-4 py-3 text-sm font-semibold rounded-xl bg-emerald-500 text-white shadow-md"
                            } else {
                                "flex-1 flex items-center justify-center gap-2 px-4 py-3 text-sm font-semibold rounded-xl bg-slate-100 text-[#1a365d] hover:bg-slate-200"
                            };
                            html! {
                                <button class={class_name} onclick={Callback::from(move |_| on_select_tab.emit(tab))}>
                                    { tab_icon(tab) }
                                    <span>{ tab.label() }</span>
                                </button>
                            }
                        }) }
                    </div>
                    <button onclick={open_add} class="flex items-center gap-2 px-5 py-3 text-sm font-semibold rounded-xl bg-amber-500 hover:bg-amber-600 text-white shadow-md transition-colors">
                        { icon_plus() }
                        <span>{"Add Expense"}</span>
                    </button>
                </div>

                <Banner message={(*page_error).clone()} on_clear={clear_banner} />

                { content }
            </main>
            {
                if tab_state.add_open() {
                    html! {
                        <Modal title="Add New Expense" on_close={close_add.clone()}>
                            <ExpenseFormFields
                                busy={create_gate.busy()}
                                on_submit={on_create}
                                on_cancel={close_add}
                            />
                        </Modal>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn tab_icon(tab: Tab) -> Html {
    match tab {
        Tab::Overview => icon_wallet(),
        Tab::Expenses => icon_layout_list(),
        Tab::Receipt => icon_camera(),
        Tab::Analysis => icon_brain(),
        Tab::Chat => icon_message(),
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
fn icon_layout_list() -> Html {
    icon_base("M3 4h4v4H3zM3 10h4v4H3zM3 16h4v4H3zM10 5h11M10 12h11M10 19h11")
}
fn icon_camera() -> Html {
    icon_base("M3 7h4l2-2h6l2 2h4v12H3zM12 16a3 3 0 100-6 3 3 0 000 6z")
}
fn icon_brain() -> Html {
    icon_base("M12 3a4 4 0 00-4 4v1a4 4 0 00-2 7 4 4 0 004 6h4a4 4 0 004-6 4 4 0 00-2-7V7a4 4 0 00-4-4z")
}
fn icon_message() -> Html {
    icon_base("M21 15a2 2 0 01-2 2H7l-4 4V5a2 2 0 012-2h14a2 2 0 012 2z")
}
fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
fn icon_pencil() -> Html {
    icon_base("M17 3l4 4L7 21H3v-4L17 3z")
}
fn icon_trash() -> Html {
    icon_base("M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6M10 11v6M14 11v6")
}
fn icon_thumbs_up() -> Html {
    icon_base("M7 10v12M15 5.88L14 10h5.83a2 2 0 011.92 2.56l-2.33 8A2 2 0 0117.5 22H4a2 2 0 01-2-2v-8a2 2 0 012-2h2.76a2 2 0 001.79-1.11L12 2a3.13 3.13 0 013 3.88z")
}
fn icon_thumbs_down() -> Html {
    icon_base("M17 14V2M9 18.12L10 14H4.17a2 2 0 01-1.92-2.56l2.33-8A2 2 0 016.5 2H20a2 2 0 012 2v8a2 2 0 01-2 2h-2.76a2 2 0 00-1.79 1.11L12 22a3.13 3.13 0 01-3-3.88z")
}
fn icon_send() -> Html {
    icon_base("M22 2L11 13M22 2l-7 20-4-9-9-4 20-7z")
}
fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
fn icon_x() -> Html {
    icon_base("M18 6L6 18M6 6l12 12")
}

fn main() {
    yew::Renderer::<App>::new().render();
}
