use std::rc::Rc;

use alloy_primitives::Address;
use dioxus::prelude::*;
use futures::channel::mpsc;
use futures::{stream, StreamExt};

use crate::client::ClientView;
use crate::config::ContractConfig;
use crate::provider::AccountsHandler;
use crate::state::{Action, ClientState, Field};
use crate::wallet::InjectedProvider;

#[derive(Clone, Debug)]
enum UiCommand {
    AccountsChanged(Vec<String>),
    Refresh,
    Donate,
    Withdraw,
}

const INPUT_STYLE: &str = "
    flex: 1;
    background: #0f172a;
    color: white;
    padding: 12px;
    border-radius: 8px;
    border: 1px solid #334155;
    font-size: 16px;
    outline: none;
";

const ROW_STYLE: &str = "color: #e0e0e0; font-size: 15px; margin-top: 12px; display: flex; justify-content: space-between; gap: 12px;";

#[component]
pub fn CrowdFundPage() -> Element {
    let state = use_signal(ClientState::default);
    let config = use_hook(ContractConfig::default);
    let symbol = config.symbol.clone();

    // Commands run one at a time in arrival order, so a refresh never
    // overlaps a pending transaction.
    let commands = use_coroutine(move |rx: UnboundedReceiver<UiCommand>| {
        let config = config.clone();
        async move {
            let dispatch = move |action: Action| {
                let mut state = state;
                state.with_mut(|s| *s = std::mem::take(s).reduce(action));
            };

            let (changed_tx, changed_rx) = mpsc::unbounded();
            let on_change: AccountsHandler = Rc::new(move |accounts: Vec<String>| {
                let _ = changed_tx.unbounded_send(accounts);
            });

            let view = match ClientView::new(InjectedProvider::detect(), &config, on_change) {
                Ok(view) => view,
                Err(e) => {
                    log::error!("Contract setup failed: {}", e);
                    dispatch(Action::ActionFailed(e.to_string()));
                    return;
                }
            };

            // a failed mount is already surfaced; Refresh retries the connection
            if let Err(e) = view.mount(&dispatch).await {
                log::debug!("Initial load incomplete: {}", e);
            }

            let mut queue = stream::select(rx, changed_rx.map(UiCommand::AccountsChanged));
            while let Some(command) = queue.next().await {
                let snapshot = state.read().clone();
                let outcome = match command {
                    UiCommand::AccountsChanged(accounts) => view.on_accounts_changed(accounts, &dispatch).await,
                    UiCommand::Refresh => view.full_refresh(&snapshot, &dispatch).await,
                    UiCommand::Donate => view.donate(&snapshot, &dispatch).await.map(|_| ()),
                    UiCommand::Withdraw => view.withdraw(&snapshot, &dispatch).await.map(|_| ()),
                };
                // already logged and shown in `state.error`
                if let Err(e) = outcome {
                    log::debug!("Command finished with error: {}", e);
                }
            }
        }
    });

    let on_input = move |field: Field| {
        move |e: FormEvent| {
            let mut state = state;
            state.with_mut(|s| *s = std::mem::take(s).reduce(Action::InputChanged(field, e.value())));
        }
    };

    let current = state.read().clone();
    let busy = current.is_pending();
    let show_amount = |amount: &Option<String>| match amount {
        Some(v) => format!("{} {}", v, symbol),
        None => "-".to_string(),
    };
    let donated = show_amount(&current.balances.donated_by_me);
    let funded = show_amount(&current.balances.total_funded);
    let withdrawn = show_amount(&current.balances.total_withdrawn);
    let fund_raiser = current
        .fund_raiser
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string());

    rsx! {
        div {
            style: "max-width: 560px; width: 100%; margin: 0 auto; padding: 24px; background: linear-gradient(135deg, #1e293b 0%, #0f172a 100%); border-radius: 16px; box-shadow: 0 8px 32px rgba(0,0,0,0.4); border: 2px solid #334155;",

            h2 {
                style: "color: #e0e0e0; margin-bottom: 8px; font-size: 24px; text-align: center;",
                "Crowd Funding DAPP"
            }

            div {
                style: "color: #94a3b8; margin-bottom: 24px; font-size: 14px; text-align: center;",
                if let Some(account) = current.account {
                    "Connected: {short_address(&account)}"
                } else {
                    "Wallet not connected"
                }
            }

            // Error message
            if let Some(ref err) = current.error {
                div {
                    style: "color: #ef4444; margin-bottom: 16px; font-size: 14px; padding: 12px; background: rgba(239, 68, 68, 0.1); border-radius: 8px; border: 1px solid #ef4444;",
                    "{err}"
                }
            }

            form {
                style: "display: flex; gap: 8px; margin-bottom: 16px;",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    commands.send(UiCommand::Donate);
                },
                input {
                    r#type: "text",
                    name: "donateAmount",
                    value: "{current.inputs.donate_amount}",
                    oninput: on_input(Field::DonateAmount),
                    placeholder: "0.0000 {symbol}",
                    style: INPUT_STYLE,
                }
                button {
                    r#type: "submit",
                    disabled: busy,
                    style: "background: #7c3aed; color: white; padding: 12px 16px; border-radius: 8px; border: none; font-weight: 600; cursor: pointer;",
                    "Donate Fund"
                }
            }

            div {
                style: "background: #0f172a; padding: 16px; border-radius: 12px; border: 1px solid #334155;",
                div { style: ROW_STYLE, span { "Total fund donated by me" } span { style: "font-weight: 600;", "{donated}" } }
                div { style: ROW_STYLE, span { "Total amount funded" } span { style: "font-weight: 600;", "{funded}" } }
                div { style: ROW_STYLE, span { "Total amount withdrawn" } span { style: "font-weight: 600;", "{withdrawn}" } }
                div {
                    style: ROW_STYLE,
                    span { "Fund raiser" }
                    span { style: "font-family: monospace; font-size: 12px; word-break: break-all;", "{fund_raiser}" }
                }
                button {
                    onclick: move |_| commands.send(UiCommand::Refresh),
                    disabled: busy,
                    style: "width: 100%; margin-top: 16px; background: #334155; color: white; padding: 8px; border-radius: 8px; border: 1px solid #475569; cursor: pointer;",
                    "Refresh"
                }
            }

            if busy {
                div {
                    style: "color: #64748b; font-size: 14px; margin-top: 12px; text-align: center;",
                    "Waiting for confirmation..."
                }
            }
            if !busy {
                if let Some(ref hash) = current.last_tx {
                    div {
                        style: "color: #34d399; font-size: 12px; margin-top: 12px; word-break: break-all;",
                        "Confirmed: {hash}"
                    }
                }
            }

            if current.show_withdraw_panel() {
                div {
                    style: "margin-top: 24px; padding: 16px; border-radius: 12px; border: 2px solid #6366f1;",
                    h3 {
                        style: "color: #e0e0e0; margin: 0 0 12px 0; font-size: 18px;",
                        "Fund Raiser's Panel"
                    }
                    form {
                        style: "display: flex; flex-direction: column; gap: 8px;",
                        onsubmit: move |evt: FormEvent| {
                            evt.prevent_default();
                            commands.send(UiCommand::Withdraw);
                        },
                        input {
                            r#type: "text",
                            name: "withdraweeAddress",
                            value: "{current.inputs.withdrawee_address}",
                            oninput: on_input(Field::WithdraweeAddress),
                            placeholder: "Enter address of account in which to withdraw",
                            style: INPUT_STYLE,
                        }
                        input {
                            r#type: "text",
                            name: "withdrawAmount",
                            value: "{current.inputs.withdraw_amount}",
                            oninput: on_input(Field::WithdrawAmount),
                            placeholder: "Enter amount to withdraw",
                            style: INPUT_STYLE,
                        }
                        button {
                            r#type: "submit",
                            disabled: busy,
                            style: "background: #475569; color: white; padding: 12px; border-radius: 8px; border: none; font-weight: 600; cursor: pointer;",
                            "Withdraw Money"
                        }
                    }
                }
            }
        }
    }
}

/// `0x1234...abcd` form of the checksummed address.
fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
