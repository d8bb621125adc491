//! UI state of the crowdfunding page and the reducer that evolves it.
//!
//! Every change goes through [`ClientState::reduce`], so the transition
//! sequence (disconnected, refreshing, idle, pending) can be checked
//! without a renderer.

use alloy_primitives::Address;

use crate::config::NO_WALLET_MESSAGE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Disconnected,
    Refreshing,
    Idle,
    Pending(TxKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxKind {
    Donate,
    Withdraw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    WithdraweeAddress,
    WithdrawAmount,
    DonateAmount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub withdrawee_address: String,
    pub withdraw_amount: String,
    pub donate_amount: String,
}

/// Balances already converted to display units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayBalances {
    pub donated_by_me: Option<String>,
    pub total_funded: Option<String>,
    pub total_withdrawn: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientState {
    pub phase: Phase,
    pub account: Option<Address>,
    pub inputs: FormInputs,
    pub fund_raiser: Option<Address>,
    pub is_fund_raiser: bool,
    pub balances: DisplayBalances,
    pub error: Option<String>,
    /// hash of the last confirmed transaction
    pub last_tx: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ProviderMissing,
    Connected(Address),
    /// wallet reported no authorized accounts
    Disconnected,
    RefreshStarted,
    RefreshFinished,
    FundRaiserLoaded { fund_raiser: Address, account: Address },
    DonatedFundLoaded(String),
    TotalFundedLoaded(String),
    TotalWithdrawnLoaded(String),
    InputChanged(Field, String),
    TxStarted(TxKind),
    TxConfirmed { kind: TxKind, hash: String },
    ActionFailed(String),
}

impl ClientState {
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::ProviderMissing => Self {
                phase: Phase::Disconnected,
                error: Some(NO_WALLET_MESSAGE.to_string()),
                ..self
            },
            Action::Connected(account) => Self {
                phase: Phase::Refreshing,
                account: Some(account),
                error: None,
                ..self
            },
            Action::Disconnected => Self {
                phase: Phase::Disconnected,
                account: None,
                is_fund_raiser: false,
                balances: DisplayBalances {
                    donated_by_me: None,
                    ..self.balances
                },
                ..self
            },
            Action::RefreshStarted => Self {
                phase: if self.account.is_some() {
                    Phase::Refreshing
                } else {
                    self.phase
                },
                ..self
            },
            Action::RefreshFinished => Self {
                phase: match self.phase {
                    Phase::Refreshing => Phase::Idle,
                    other => other,
                },
                ..self
            },
            Action::FundRaiserLoaded { fund_raiser, account } => Self {
                fund_raiser: Some(fund_raiser),
                // Address equality is on bytes, so hex case never matters.
                is_fund_raiser: fund_raiser == account,
                ..self
            },
            Action::DonatedFundLoaded(amount) => Self {
                balances: DisplayBalances {
                    donated_by_me: Some(amount),
                    ..self.balances
                },
                ..self
            },
            Action::TotalFundedLoaded(amount) => Self {
                balances: DisplayBalances {
                    total_funded: Some(amount),
                    ..self.balances
                },
                ..self
            },
            Action::TotalWithdrawnLoaded(amount) => Self {
                balances: DisplayBalances {
                    total_withdrawn: Some(amount),
                    ..self.balances
                },
                ..self
            },
            Action::InputChanged(field, value) => {
                let mut inputs = self.inputs;
                match field {
                    Field::WithdraweeAddress => inputs.withdrawee_address = value,
                    Field::WithdrawAmount => inputs.withdraw_amount = value,
                    Field::DonateAmount => inputs.donate_amount = value,
                }
                Self { inputs, ..self }
            }
            Action::TxStarted(kind) => Self {
                phase: Phase::Pending(kind),
                error: None,
                ..self
            },
            Action::TxConfirmed { kind, hash } => {
                let mut inputs = self.inputs;
                if kind == TxKind::Donate {
                    inputs.donate_amount.clear();
                }
                Self {
                    phase: Phase::Refreshing,
                    inputs,
                    last_tx: Some(hash),
                    ..self
                }
            }
            Action::ActionFailed(reason) => Self {
                phase: if self.account.is_some() {
                    Phase::Idle
                } else {
                    Phase::Disconnected
                },
                error: Some(reason),
                ..self
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    pub fn show_withdraw_panel(&self) -> bool {
        self.is_fund_raiser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn run(actions: Vec<Action>) -> ClientState {
        actions.into_iter().fold(ClientState::default(), ClientState::reduce)
    }

    #[test]
    fn walks_the_connection_sequence() {
        let account = addr("0x1111111111111111111111111111111111111111");
        let mut state = ClientState::default();
        assert_eq!(state.phase, Phase::Disconnected);

        state = state.reduce(Action::Connected(account));
        assert_eq!(state.phase, Phase::Refreshing);

        state = state.reduce(Action::RefreshFinished);
        assert_eq!(state.phase, Phase::Idle);

        state = state.reduce(Action::InputChanged(Field::DonateAmount, "1".into()));
        assert_eq!(state.phase, Phase::Idle);

        state = state.reduce(Action::TxStarted(TxKind::Donate));
        assert_eq!(state.phase, Phase::Pending(TxKind::Donate));
        assert!(state.is_pending());

        state = state.reduce(Action::TxConfirmed {
            kind: TxKind::Donate,
            hash: "0xabc".into(),
        });
        assert_eq!(state.phase, Phase::Refreshing);
        assert_eq!(state.inputs.donate_amount, "");
        assert_eq!(state.last_tx.as_deref(), Some("0xabc"));

        state = state.reduce(Action::RefreshFinished);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn fund_raiser_match_ignores_case() {
        let state = run(vec![Action::FundRaiserLoaded {
            fund_raiser: addr("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
            account: addr("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
        }]);
        assert!(state.is_fund_raiser);
        assert!(state.show_withdraw_panel());

        let state = state.reduce(Action::FundRaiserLoaded {
            fund_raiser: addr("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
            account: addr("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
        });
        assert!(!state.show_withdraw_panel());
    }

    #[test]
    fn withdraw_confirmation_keeps_donate_input() {
        let state = run(vec![
            Action::InputChanged(Field::DonateAmount, "3".into()),
            Action::InputChanged(Field::WithdrawAmount, "0.25".into()),
            Action::TxConfirmed {
                kind: TxKind::Withdraw,
                hash: "0x1".into(),
            },
        ]);
        assert_eq!(state.inputs.donate_amount, "3");
        assert_eq!(state.inputs.withdraw_amount, "0.25");
    }

    #[test]
    fn failure_surfaces_error_and_keeps_balances() {
        let account = addr("0x1111111111111111111111111111111111111111");
        let before = run(vec![
            Action::Connected(account),
            Action::TotalFundedLoaded("2.0".into()),
            Action::RefreshFinished,
            Action::InputChanged(Field::DonateAmount, "1.5".into()),
            Action::TxStarted(TxKind::Donate),
        ]);
        let after = before.clone().reduce(Action::ActionFailed("user rejected".into()));
        assert_eq!(after.phase, Phase::Idle);
        assert_eq!(after.error.as_deref(), Some("user rejected"));
        assert_eq!(after.balances, before.balances);
        assert_eq!(after.inputs.donate_amount, "1.5");
    }

    #[test]
    fn missing_provider_sets_fixed_message() {
        let state = run(vec![Action::ProviderMissing]);
        assert_eq!(
            state.error.as_deref(),
            Some("Please install a MetaMask wallet to use our bank.")
        );
        assert_eq!(state.phase, Phase::Disconnected);
    }

    #[test]
    fn locking_the_wallet_drops_account_scoped_data() {
        let account = addr("0x1111111111111111111111111111111111111111");
        let state = run(vec![
            Action::Connected(account),
            Action::FundRaiserLoaded {
                fund_raiser: account,
                account,
            },
            Action::DonatedFundLoaded("1.0".into()),
            Action::TotalFundedLoaded("9.0".into()),
            Action::Disconnected,
        ]);
        assert_eq!(state.account, None);
        assert!(!state.is_fund_raiser);
        assert_eq!(state.balances.donated_by_me, None);
        assert_eq!(state.balances.total_funded.as_deref(), Some("9.0"));
    }
}
