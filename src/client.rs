//! ClientView: binds the wallet and the CrowdFunding contract to
//! [`ClientState`]. Every operation reports progress through a dispatch
//! callback and returns its outcome, so the page can surface failures
//! instead of only logging them.

use std::cell::Cell;

use alloy_primitives::{Address, U256};
use futures::join;

use crate::config::ContractConfig;
use crate::contract::CrowdFunding;
use crate::error::{ClientError, Result};
use crate::provider::{AccountsHandler, TxReceipt, WalletProvider};
use crate::state::{Action, ClientState, TxKind};
use crate::units::{format_amount, parse_amount};

pub type Dispatch<'a> = &'a dyn Fn(Action);

pub struct ClientView<P> {
    provider: Option<P>,
    contract: CrowdFunding,
    symbol: String,
    on_accounts_changed: AccountsHandler,
    /// set once `on_accounts_changed` is registered with the wallet
    subscribed: Cell<bool>,
}

impl<P: WalletProvider> ClientView<P> {
    pub fn new(provider: Option<P>, config: &ContractConfig, on_accounts_changed: AccountsHandler) -> Result<Self> {
        let contract = CrowdFunding::new(config)?;
        log::info!("Using CrowdFunding at {}", contract.address());
        Ok(Self {
            provider,
            contract,
            symbol: config.symbol.clone(),
            on_accounts_changed,
            subscribed: Cell::new(false),
        })
    }

    /// Connection check followed by the first full refresh.
    pub async fn mount(&self, dispatch: Dispatch<'_>) -> Result<()> {
        let account = self.connect(dispatch).await?;
        let provider = self.require_provider(dispatch)?;
        let outcome = self.refresh_all(provider, account, dispatch).await;
        self.report(dispatch, outcome)
    }

    /// Requests account access and, the first time it succeeds, subscribes
    /// the `accountsChanged` handler. Safe to call again after a failure.
    pub async fn connect(&self, dispatch: Dispatch<'_>) -> Result<Address> {
        let provider = self.require_provider(dispatch)?;
        let outcome = async {
            let account = current_account(provider).await?;
            if !self.subscribed.get() {
                provider.subscribe_accounts_changed(self.on_accounts_changed.clone())?;
                self.subscribed.set(true);
            }
            Ok::<_, ClientError>(account)
        }
        .await;
        let account = self.report(dispatch, outcome)?;
        log::info!("Account connected: {}", account);
        dispatch(Action::Connected(account));
        Ok(account)
    }

    /// Handles an `accountsChanged` payload: re-runs the full refresh for the
    /// new account, or drops back to disconnected when the list is empty.
    pub async fn on_accounts_changed(&self, accounts: Vec<String>, dispatch: Dispatch<'_>) -> Result<()> {
        let provider = self.require_provider(dispatch)?;
        let Some(first) = accounts.first() else {
            log::info!("Wallet reported no accounts");
            dispatch(Action::Disconnected);
            return Ok(());
        };
        let account = self.report(dispatch, first.parse::<Address>().map_err(ClientError::from))?;
        log::info!("Active account changed to {}", account);
        dispatch(Action::Connected(account));
        let outcome = self.refresh_all(provider, account, dispatch).await;
        self.report(dispatch, outcome)
    }

    /// Re-checks the connection and reloads every field. Goes through
    /// [`connect`](Self::connect) until a connection has succeeded, so a
    /// dismissed first prompt can be retried from the page.
    pub async fn full_refresh(&self, state: &ClientState, dispatch: Dispatch<'_>) -> Result<()> {
        let provider = self.require_provider(dispatch)?;
        let account = if state.account.is_none() || !self.subscribed.get() {
            self.connect(dispatch).await?
        } else {
            let account = self.report(dispatch, current_account(provider).await)?;
            if state.account != Some(account) {
                log::info!("Active account changed to {}", account);
                dispatch(Action::Connected(account));
            }
            account
        };
        let outcome = self.refresh_all(provider, account, dispatch).await;
        self.report(dispatch, outcome)
    }

    /// Donates the amount typed into the donate field. On confirmation the
    /// field is cleared and the caller's donation and the funded total are
    /// reloaded.
    pub async fn donate(&self, state: &ClientState, dispatch: Dispatch<'_>) -> Result<TxReceipt> {
        let provider = self.require_provider(dispatch)?;
        let value = self.report(dispatch, parse_amount(&state.inputs.donate_amount))?;

        dispatch(Action::TxStarted(TxKind::Donate));
        let outcome = async {
            let account = match state.account {
                Some(account) => account,
                None => current_account(provider).await?,
            };
            let hash = self.contract.donate_fund(provider, account, value).await?;
            log::info!("Depositing {} {}... ({})", state.inputs.donate_amount.trim(), self.symbol, hash);
            let receipt = self.contract.wait_for_confirmation(provider, &hash).await?;
            log::info!("Deposited money...done {}", hash);
            Ok::<_, ClientError>((account, receipt))
        }
        .await;
        let (account, receipt) = self.report(dispatch, outcome)?;

        dispatch(Action::TxConfirmed {
            kind: TxKind::Donate,
            hash: receipt.transaction_hash.clone(),
        });
        let (donated, funded) = join!(
            self.load_donated_fund(provider, account, dispatch),
            self.load_total_funded(provider, dispatch),
        );
        dispatch(Action::RefreshFinished);
        self.report(dispatch, donated.and(funded))?;
        Ok(receipt)
    }

    /// Withdraws to the typed withdrawee address. Only the fund raiser may
    /// do this; anyone else is refused before any wallet request.
    pub async fn withdraw(&self, state: &ClientState, dispatch: Dispatch<'_>) -> Result<TxReceipt> {
        let provider = self.require_provider(dispatch)?;
        let checked = (|| -> Result<(Address, Address, U256)> {
            if !state.is_fund_raiser {
                return Err(ClientError::NotFundRaiser);
            }
            let account = state.account.ok_or(ClientError::NoAccount)?;
            let withdrawee: Address = state.inputs.withdrawee_address.trim().parse()?;
            let amount = parse_amount(&state.inputs.withdraw_amount)?;
            Ok((account, withdrawee, amount))
        })();
        let (account, withdrawee, amount) = self.report(dispatch, checked)?;

        dispatch(Action::TxStarted(TxKind::Withdraw));
        let outcome = async {
            let hash = self
                .contract
                .withdraw_funds(provider, account, withdrawee, amount)
                .await?;
            log::info!("Withdrawing money to {}... ({})", withdrawee, hash);
            let receipt = self.contract.wait_for_confirmation(provider, &hash).await?;
            log::info!("Money withdrawn...done {}", hash);
            Ok::<_, ClientError>(receipt)
        }
        .await;
        let receipt = self.report(dispatch, outcome)?;

        dispatch(Action::TxConfirmed {
            kind: TxKind::Withdraw,
            hash: receipt.transaction_hash.clone(),
        });
        let withdrawn = self.load_total_withdrawn(provider, dispatch).await;
        dispatch(Action::RefreshFinished);
        self.report(dispatch, withdrawn)?;
        Ok(receipt)
    }

    // The four refreshes can interleave with refreshes started by another
    // event; each field keeps whichever response lands last.
    async fn refresh_all(&self, provider: &P, account: Address, dispatch: Dispatch<'_>) -> Result<()> {
        dispatch(Action::RefreshStarted);
        let (fund_raiser, donated, funded, withdrawn) = join!(
            self.load_fund_raiser(provider, account, dispatch),
            self.load_donated_fund(provider, account, dispatch),
            self.load_total_funded(provider, dispatch),
            self.load_total_withdrawn(provider, dispatch),
        );
        dispatch(Action::RefreshFinished);
        fund_raiser.and(donated).and(funded).and(withdrawn)
    }

    async fn load_fund_raiser(&self, provider: &P, account: Address, dispatch: Dispatch<'_>) -> Result<()> {
        let fund_raiser = self.contract.fund_raiser(provider).await?;
        log::info!("Fund raiser is {}", fund_raiser);
        dispatch(Action::FundRaiserLoaded { fund_raiser, account });
        Ok(())
    }

    async fn load_donated_fund(&self, provider: &P, account: Address, dispatch: Dispatch<'_>) -> Result<()> {
        let amount = self.contract.donated_fund(provider, account).await?;
        log::info!("Retrieved donated fund: {}", amount);
        dispatch(Action::DonatedFundLoaded(format_amount(amount)));
        Ok(())
    }

    async fn load_total_funded(&self, provider: &P, dispatch: Dispatch<'_>) -> Result<()> {
        let amount = self.contract.total_amount_funded(provider).await?;
        log::info!("Retrieved total funded: {}", amount);
        dispatch(Action::TotalFundedLoaded(format_amount(amount)));
        Ok(())
    }

    async fn load_total_withdrawn(&self, provider: &P, dispatch: Dispatch<'_>) -> Result<()> {
        let amount = self.contract.total_amount_withdrawn(provider).await?;
        log::info!("Retrieved total withdrawn: {}", amount);
        dispatch(Action::TotalWithdrawnLoaded(format_amount(amount)));
        Ok(())
    }

    fn require_provider(&self, dispatch: Dispatch<'_>) -> Result<&P> {
        match &self.provider {
            Some(provider) => Ok(provider),
            None => {
                log::warn!("Ethereum object not found, install MetaMask.");
                dispatch(Action::ProviderMissing);
                Err(ClientError::ProviderMissing)
            }
        }
    }

    /// Logs and surfaces a failure; passes successes through.
    fn report<T>(&self, dispatch: Dispatch<'_>, outcome: Result<T>) -> Result<T> {
        outcome.map_err(|e| {
            log::error!("{}", e);
            dispatch(Action::ActionFailed(e.to_string()));
            e
        })
    }
}

async fn current_account<P: WalletProvider>(provider: &P) -> Result<Address> {
    let accounts = provider.request_accounts().await?;
    Ok(accounts.first().ok_or(ClientError::NoAccount)?.parse()?)
}
