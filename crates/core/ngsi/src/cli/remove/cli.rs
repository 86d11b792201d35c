use crate::cli::common::endpoint;
use crate::cli::common::http_client;
use crate::cli::common::link_url;
use crate::cli::common::resolve_broker;
use crate::cli::common::BrokerOverrides;
use crate::cli::remove::RemoveCmd;
use crate::cli::remove::RemoveRoute;
use crate::client::BrokerClient;
use crate::command::BuildCommand;
use crate::command::BuildContext;
use crate::command::Command;
use crate::warning;
use crate::NgsiError;
use ngsi_api::NgsiType;
use ngsi_config::ConfigError;
use ngsi_config::PreviousArgs;

#[derive(clap::Args, Debug)]
pub struct RemoveCli {
    /// Broker: an alias of the broker registry or a URL.
    /// Defaults to the broker of the previous remove
    #[clap(long)]
    pub host: Option<String>,

    /// Entity types to remove, separated by commas
    #[clap(short = 't', long = "type", value_delimiter = ',', required = true)]
    pub entity_types: Vec<String>,

    /// Tenant of the broker
    #[clap(long)]
    pub tenant: Option<String>,

    /// Scope (FIWARE service path)
    #[clap(long)]
    pub scope: Option<String>,

    /// Bearer token
    #[clap(long)]
    pub token: Option<String>,

    /// JSON-LD context of an NGSI-LD broker, sent as a Link header: a context name or a URL
    #[clap(long)]
    pub link: Option<String>,

    /// API of a broker given as a URL: v2 or ld
    #[clap(long)]
    pub ngsi_type: Option<NgsiType>,

    /// Remove with the NGSIv1 API of an NGSIv2 broker
    #[clap(long = "ngsi-v1", alias = "ngsiV1")]
    pub ngsi_v1: bool,

    /// Don't forward the queries of an NGSIv2 broker to context providers
    #[clap(long, alias = "skipForwarding")]
    pub skip_forwarding: bool,

    /// Remove the entities. Without this flag, only count them
    #[clap(long)]
    pub run: bool,
}

impl BuildCommand for RemoveCli {
    fn build_command(self, context: BuildContext) -> Result<Box<dyn Command>, NgsiError> {
        let config = context.load_config()?;
        let location = &context.config_location;

        if self.entity_types.iter().any(|t| t.trim().is_empty()) {
            return Err(NgsiError::MissingEntityType);
        }

        let use_previous_args = config.settings.use_previous_args;
        let previous = if use_previous_args && self.host.is_none() {
            PreviousArgs::load(location)?
        } else {
            PreviousArgs::default()
        };
        let selection = PreviousArgs {
            host: self.host.or(previous.host),
            tenant: self.tenant.or(previous.tenant),
            scope: self.scope.or(previous.scope),
        };
        let Some(host) = selection.host.as_deref() else {
            return Err(ConfigError::MissingBroker.into());
        };

        let broker = resolve_broker(
            &config,
            location,
            host,
            BrokerOverrides {
                ngsi_type: self.ngsi_type,
                tenant: selection.tenant.clone(),
                scope: selection.scope.clone(),
                token: self.token,
            },
        )?;

        let route = match broker.ngsi_type {
            NgsiType::V2 if self.ngsi_v1 => RemoveRoute::V1,
            NgsiType::V2 => RemoveRoute::V2,
            NgsiType::Ld if self.ngsi_v1 => return Err(NgsiError::V1OnLd),
            NgsiType::Ld => RemoveRoute::Ld,
        };
        if self.skip_forwarding && route != RemoveRoute::V2 {
            warning!("--skip-forwarding is only used with the NGSIv2 API");
        }

        let link = link_url(&config, &broker, self.link)?;
        let client = BrokerClient::new(http_client()?, endpoint(&broker, link));

        Ok(RemoveCmd {
            broker: client,
            route,
            entity_types: self.entity_types,
            run: self.run,
            skip_forwarding: self.skip_forwarding,
            previous_args: use_previous_args.then(|| (location.clone(), selection)),
        }
        .into_boxed())
    }
}
