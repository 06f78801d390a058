use bitcoin::{Network, OutPoint, Txid};
use clap::{Arg, Command};
use ordtrace_core::Interval;
use ordtrace_node::{NodeConfig, RestConfig, RpcAuth, RpcConfig};
use serde::Deserialize;
use std::{ffi::OsString, fs};

/// Connection settings, overridable per flag and preloadable from a TOML
/// config file. Flags win over the file, the file wins over defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub network: String,
    pub rpc_url: Option<String>,
    pub rpc_user: Option<String>,
    pub rpc_pass: Option<String>,
    pub rpc_cookie: Option<String>,
    pub rest_url: Option<String>,
    pub loglevel: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: "mainnet".to_owned(),
            rpc_url: None,
            rpc_user: None,
            rpc_pass: None,
            rpc_cookie: None,
            rest_url: None,
            loglevel: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Subcommand {
    Trace { outpoint: OutPoint, range: Option<Interval> },
    Audit { from: u64, to: u64 },
    Status,
}

#[derive(Debug, Clone)]
pub struct Args {
    pub network: Network,
    pub node: NodeConfig,
    pub loglevel: String,
    pub command: Subcommand,
}

pub fn cli() -> Command {
    Command::new("ordtrace")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(Arg::new("config").long("config").short('C').value_name("config").help("Path to a TOML file with connection settings"))
        .arg(
            Arg::new("network")
                .long("network")
                .short('n')
                .value_name("network")
                .help("Network the node follows: mainnet, testnet, signet or regtest"),
        )
        .arg(
            Arg::new("rpc-url")
                .long("rpc-url")
                .value_name("rpc-url")
                .help("Bitcoin Core JSON-RPC endpoint, defaults to the well-known port of the network"),
        )
        .arg(Arg::new("rpc-user").long("rpc-user").value_name("rpc-user").requires("rpc-pass").help("RPC username"))
        .arg(Arg::new("rpc-pass").long("rpc-pass").value_name("rpc-pass").requires("rpc-user").help("RPC password"))
        .arg(
            Arg::new("rpc-cookie")
                .long("rpc-cookie")
                .value_name("file")
                .help("Cookie file holding Bitcoin Core RPC credentials"),
        )
        .arg(
            Arg::new("rest-url")
                .long("rest-url")
                .value_name("rest-url")
                .help("Esplora REST endpoint, used instead of JSON-RPC when set"),
        )
        .arg(
            Arg::new("loglevel")
                .long("loglevel")
                .short('d')
                .value_name("loglevel")
                .help("Logging filter, e.g. info or ordtrace_track=trace"),
        )
        .subcommand(
            Command::new("trace")
                .about("Resolve which satoshis an output holds")
                .arg(
                    Arg::new("txid")
                        .long("txid")
                        .short('t')
                        .value_name("txid")
                        .required(true)
                        .value_parser(clap::value_parser!(Txid))
                        .help("Transaction id of the output"),
                )
                .arg(
                    Arg::new("vout")
                        .long("vout")
                        .short('o')
                        .value_name("vout")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u32))
                        .help("Output index within the transaction"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("start")
                        .requires("end")
                        .value_parser(clap::value_parser!(u64))
                        .help("First tracked satoshi position within the output, inclusive"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("end")
                        .requires("start")
                        .value_parser(clap::value_parser!(u64))
                        .help("Last tracked satoshi position within the output, exclusive"),
                ),
        )
        .subcommand(
            Command::new("audit")
                .about("Verify coinbase structure over a window of block heights")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_name("from")
                        .required(true)
                        .value_parser(clap::value_parser!(u64))
                        .help("First height to audit"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("to")
                        .required(true)
                        .value_parser(clap::value_parser!(u64))
                        .help("Last height to audit, inclusive"),
                ),
        )
        .subcommand(Command::new("status").about("Report backend and chain tip"))
}

pub fn parse_args() -> Args {
    match Args::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            println!("{err}");
            std::process::exit(1);
        }
    }
}

impl Args {
    pub fn parse<I, T>(itr: I) -> Result<Args, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let m = cli().try_get_matches_from(itr)?;

        let mut defaults = Settings::default();
        if let Some(config_file) = m.get_one::<String>("config") {
            let config_str = fs::read_to_string(config_file)?;
            defaults = toml::from_str(&config_str).map_err(|toml_error| {
                clap::Error::raw(
                    clap::error::ErrorKind::ValueValidation,
                    format!("failed parsing config file, reason: {}", toml_error.message()),
                )
            })?;
        }

        let network = parse_network(&m.get_one::<String>("network").cloned().unwrap_or(defaults.network))?;
        let rpc_url = m.get_one::<String>("rpc-url").cloned().or(defaults.rpc_url);
        let rpc_user = m.get_one::<String>("rpc-user").cloned().or(defaults.rpc_user);
        let rpc_pass = m.get_one::<String>("rpc-pass").cloned().or(defaults.rpc_pass);
        let rpc_cookie = m.get_one::<String>("rpc-cookie").cloned().or(defaults.rpc_cookie);
        let rest_url = m.get_one::<String>("rest-url").cloned().or(defaults.rest_url);
        let loglevel = m.get_one::<String>("loglevel").cloned().unwrap_or(defaults.loglevel);

        let node = match rest_url {
            Some(base_url) => NodeConfig::Rest(RestConfig::new(base_url)),
            None => {
                let url = rpc_url.unwrap_or_else(|| format!("http://127.0.0.1:{}", default_rpc_port(network)));
                let mut rpc = RpcConfig::new(url);
                rpc.auth = match (rpc_cookie, rpc_user, rpc_pass) {
                    (Some(file), _, _) => RpcAuth::Cookie { file: file.into() },
                    (None, Some(username), Some(password)) => RpcAuth::UserPass { username, password },
                    (None, _, _) => RpcAuth::None,
                };
                NodeConfig::Rpc(rpc)
            }
        };

        let command = match m.subcommand() {
            Some(("trace", sub)) => {
                let txid = sub.get_one::<Txid>("txid").copied().unwrap();
                let vout = sub.get_one::<u32>("vout").copied().unwrap();
                let range = match (sub.get_one::<u64>("start").copied(), sub.get_one::<u64>("end").copied()) {
                    (Some(start), Some(end)) => Some(Interval::new(start, end).map_err(|err| {
                        clap::Error::raw(clap::error::ErrorKind::ValueValidation, err.to_string())
                    })?),
                    _ => None,
                };
                Subcommand::Trace { outpoint: OutPoint { txid, vout }, range }
            }
            Some(("audit", sub)) => {
                let from = sub.get_one::<u64>("from").copied().unwrap();
                let to = sub.get_one::<u64>("to").copied().unwrap();
                if to < from {
                    return Err(clap::Error::raw(
                        clap::error::ErrorKind::ValueValidation,
                        "audit window end precedes its start",
                    ));
                }
                Subcommand::Audit { from, to }
            }
            Some(("status", _)) => Subcommand::Status,
            _ => unreachable!(),
        };

        Ok(Args { network, node, loglevel, command })
    }
}

fn parse_network(name: &str) -> Result<Network, clap::Error> {
    match name {
        "mainnet" | "bitcoin" => Ok(Network::Bitcoin),
        "testnet" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => {
            Err(clap::Error::raw(clap::error::ErrorKind::ValueValidation, format!("unknown network: {}", other)))
        }
    }
}

fn default_rpc_port(network: Network) -> u16 {
    match network {
        Network::Testnet => 18332,
        Network::Signet => 38332,
        Network::Regtest => 18443,
        _ => 8332,
    }
}
