//! `estate`: command-line front end for the fractional real-estate platform.
//!
//! Every command prints a JSON result on stdout. Backend calls print the
//! `{success, data?, error?}` envelope, listing commands print the listing
//! outcome. A failed result exits with status 1.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use estate_client::api::{ApiClient, ApiOutcome, ApiResponse, NewProperty};
use estate_client::blockchain::contract::load_interface;
use estate_client::blockchain::{RpcWallet, Wallet, WalletBridge};
use estate_client::config::{load_or_default, AppConfig};
use estate_client::listing::{ChainInterface, ListingFlow, ListingOutcome, ListingState, ListingStore};
use estate_client::observability::init_logging;
use estate_client::session::Session;

type CliResult = Result<bool, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Client for the fractional real-estate platform", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the authenticated user's profile
    Me,
    /// Attach a wallet address to the account (defaults to the wallet's first account)
    LinkWallet { address: Option<String> },
    /// Browse properties
    Properties {
        #[command(subcommand)]
        command: PropertyCommands,
    },
    /// Create a property on the backend, optionally on-chain as well
    ListProperty {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        shares: u64,
        /// Continue with the on-chain creation once the backend record exists
        #[arg(long)]
        on_chain: bool,
    },
    /// Create (or retry creating) an existing backend property on-chain
    CreateOnChain { backend_id: String },
    /// Show recorded listing flows
    Listings,
    /// Buy shares from a sell order
    Buy {
        order_id: String,
        shares: u64,
    },
    /// Offer shares for sale
    SellOrder {
        property_id: String,
        shares: u64,
        #[arg(long)]
        price: f64,
    },
    /// Show the user's transaction history
    Transactions,
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        command: WalletCommands,
    },
}

#[derive(Subcommand)]
enum PropertyCommands {
    /// List all properties
    List,
    /// Show one property
    Show { property_id: String },
    /// List open sell orders for a property
    SellOrders { property_id: String },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Request account access from the wallet
    Connect,
}

/// Everything a command may need, built once per invocation.
struct App {
    config: AppConfig,
    client: ApiClient,
    store: ListingStore,
}

impl App {
    fn init(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let session = Session::load(&config.session.path)?;
        let client = ApiClient::new(config.api.base_url.clone(), Arc::new(session));
        let store = ListingStore::load_from_file(&config.listing.store_path)?;
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// The wallet bridge is only built for commands that touch the chain.
    fn wallet(&self) -> Result<RpcWallet, Box<dyn std::error::Error>> {
        let local = Wallet::from_env(self.config.blockchain.chain_id)?;
        Ok(RpcWallet::connect(&self.config.blockchain, local)?)
    }

    fn interface(&self) -> Result<ChainInterface, Box<dyn std::error::Error>> {
        let abi = load_interface(self.config.blockchain.abi_path.as_deref().map(Path::new))?;
        Ok(ChainInterface {
            abi,
            event_name: self.config.blockchain.event_name.clone(),
        })
    }

    /// A backend-only flow; the wallet is connected when the chain step runs.
    fn flow(&self, state: ListingState) -> ListingFlow<ApiClient, RpcWallet> {
        ListingFlow::without_chain(self.client.clone(), state).with_store(self.store.clone())
    }

    async fn create_on_chain(&self, flow: &mut ListingFlow<ApiClient, RpcWallet>) -> ListingOutcome {
        let connect = || -> Result<_, Box<dyn std::error::Error>> { Ok((self.wallet()?, self.interface()?)) };
        match flow.create_on_chain_with(connect).await {
            Ok(outcome) => outcome,
            Err(e) => ListingOutcome {
                success: false,
                error: Some(e.to_string()),
                ..flow.outcome()
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.observability);

    let result = match App::init(config) {
        Ok(app) => run(&app, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, command: Commands) -> CliResult {
    let client = &app.client;
    match command {
        Commands::Register {
            name,
            email,
            password,
        } => print_api(client.register(&name, &email, &password).await),
        Commands::Login { email, password } => {
            // The token goes to the session file, not to stdout.
            let response = client
                .login(&email, &password)
                .await
                .map(|login| serde_json::json!({ "message": login.message }));
            print_api(response)
        }
        Commands::Logout => {
            client.logout()?;
            print_json(&serde_json::json!({ "success": true }))?;
            Ok(true)
        }
        Commands::Me => print_api(client.profile().await),
        Commands::LinkWallet { address } => {
            let address = match address {
                Some(address) => address,
                None => match app.wallet()?.request_accounts().await?.first() {
                    Some(account) => account.to_string(),
                    None => return Err("Wallet returned no accounts".into()),
                },
            };
            print_api(client.link_wallet(&address).await)
        }
        Commands::Properties { command } => match command {
            PropertyCommands::List => print_api(client.list_properties().await),
            PropertyCommands::Show { property_id } => print_api(client.get_property(&property_id).await),
            PropertyCommands::SellOrders { property_id } => {
                print_api(client.sell_orders(&property_id).await)
            }
        },
        Commands::ListProperty {
            name,
            location,
            description,
            price,
            shares,
            on_chain,
        } => {
            let property = NewProperty {
                name,
                location,
                description,
                current_price: price,
                total_shares: shares,
                blockchain_id: None,
            };
            let mut flow = app.flow(ListingState::Idle);
            let mut outcome = flow.submit(&property).await?;
            if on_chain && flow.state().can_create_on_chain() {
                outcome = app.create_on_chain(&mut flow).await;
            }
            print_json(&outcome)?;
            Ok(outcome.success || (!on_chain && outcome.backend_id.is_some()))
        }
        Commands::CreateOnChain { backend_id } => {
            let state = match app.store.get(&backend_id) {
                Some(state) => state,
                None => {
                    let property = match client.get_property(&backend_id).await {
                        Ok(property) => property,
                        Err(e) => return print_api::<()>(Err(e)),
                    };
                    if let Some(blockchain_id) = property.blockchain_id {
                        return Err(format!(
                            "Property {} is already on-chain with id {}",
                            backend_id, blockchain_id
                        )
                        .into());
                    }
                    ListingState::BackendCreated {
                        backend_id: property.property_id,
                        total_shares: property.total_shares,
                    }
                }
            };
            let mut flow = app.flow(state);
            if !flow.state().can_create_on_chain() {
                return Err(format!("Listing {} cannot be created on-chain from its current state", backend_id).into());
            }
            let outcome = app.create_on_chain(&mut flow).await;
            print_json(&outcome)?;
            Ok(outcome.success)
        }
        Commands::Listings => {
            let listings: Vec<_> = app
                .store
                .list()
                .into_iter()
                .map(|(backend_id, state)| {
                    serde_json::json!({ "backendId": backend_id, "state": state })
                })
                .collect();
            print_json(&listings)?;
            Ok(true)
        }
        Commands::Buy { order_id, shares } => print_api(client.buy_from_order(&order_id, shares).await),
        Commands::SellOrder {
            property_id,
            shares,
            price,
        } => print_api(client.create_sell_order(&property_id, shares, price).await),
        Commands::Transactions => print_api(client.transactions().await),
        Commands::Wallet { command } => match command {
            WalletCommands::Connect => {
                let accounts = app.wallet()?.request_accounts().await?;
                print_json(&serde_json::json!({ "accounts": accounts }))?;
                Ok(true)
            }
        },
    }
}

fn print_api<T: Serialize>(response: ApiResponse<T>) -> CliResult {
    let outcome = ApiOutcome::from(response);
    print_json(&outcome)?;
    Ok(outcome.success)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
