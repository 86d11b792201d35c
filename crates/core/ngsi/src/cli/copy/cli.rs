use crate::cli::common::endpoint;
use crate::cli::common::http_client;
use crate::cli::common::link_url;
use crate::cli::common::resolve_broker;
use crate::cli::common::BrokerOverrides;
use crate::cli::copy::CopyCmd;
use crate::cli::copy::CopyRoute;
use crate::client::BrokerClient;
use crate::command::BuildCommand;
use crate::command::BuildContext;
use crate::command::Command;
use crate::warning;
use crate::NgsiError;
use ngsi_api::NgsiType;

#[derive(clap::Args, Debug)]
pub struct CopyCli {
    /// Source broker: an alias of the broker registry or a URL
    #[clap(long)]
    pub host: String,

    /// Destination broker: an alias of the broker registry or a URL
    #[clap(long)]
    pub host2: String,

    /// Entity types to copy, separated by commas
    #[clap(short = 't', long = "type", value_delimiter = ',', required = true)]
    pub entity_types: Vec<String>,

    /// Tenant of the source broker
    #[clap(long)]
    pub tenant: Option<String>,

    /// Scope (FIWARE service path) on the source broker
    #[clap(long)]
    pub scope: Option<String>,

    /// Bearer token for the source broker
    #[clap(long)]
    pub token: Option<String>,

    /// JSON-LD context of an NGSI-LD source, sent as a Link header: a context name or a URL
    #[clap(long)]
    pub link: Option<String>,

    /// API of a source broker given as a URL: v2 or ld
    #[clap(long)]
    pub ngsi_type: Option<NgsiType>,

    /// Tenant of the destination broker
    #[clap(long)]
    pub tenant2: Option<String>,

    /// Scope (FIWARE service path) on the destination broker
    #[clap(long)]
    pub scope2: Option<String>,

    /// Bearer token for the destination broker
    #[clap(long)]
    pub token2: Option<String>,

    /// JSON-LD context set on the entities written to an NGSI-LD destination:
    /// a context name, a URL or inline JSON
    #[clap(long)]
    pub context2: Option<String>,

    /// API of a destination broker given as a URL: v2 or ld
    #[clap(long)]
    pub ngsi_type2: Option<NgsiType>,

    /// Copy with the NGSIv1 API of two NGSIv2 brokers
    #[clap(long = "ngsi-v1", alias = "ngsiV1")]
    pub ngsi_v1: bool,

    /// Don't forward the queries of an NGSIv2 source to context providers
    #[clap(long, alias = "skipForwarding")]
    pub skip_forwarding: bool,

    /// Copy the entities. Without this flag, only count them
    #[clap(long)]
    pub run: bool,
}

impl BuildCommand for CopyCli {
    fn build_command(self, context: BuildContext) -> Result<Box<dyn Command>, NgsiError> {
        let config = context.load_config()?;
        let location = &context.config_location;

        if self.entity_types.iter().any(|t| t.trim().is_empty()) {
            return Err(NgsiError::MissingEntityType);
        }

        let source = resolve_broker(
            &config,
            location,
            &self.host,
            BrokerOverrides {
                ngsi_type: self.ngsi_type,
                tenant: self.tenant,
                scope: self.scope,
                token: self.token,
            },
        )?;
        let destination = resolve_broker(
            &config,
            location,
            &self.host2,
            BrokerOverrides {
                ngsi_type: self.ngsi_type2,
                tenant: self.tenant2,
                scope: self.scope2,
                token: self.token2,
            },
        )?;

        let source_endpoint = endpoint(&source, link_url(&config, &source, self.link)?);
        let destination_endpoint = endpoint(&destination, None);
        if source_endpoint.same_as(&destination_endpoint) {
            return Err(NgsiError::SameEndpoints);
        }

        let route = CopyRoute::select(source.ngsi_type, destination.ngsi_type, self.ngsi_v1)?;

        let at_context = match self.context2 {
            Some(name) if destination.ngsi_type == NgsiType::Ld => Some(config.at_context(&name)?),
            Some(_) => {
                warning!("--context2 is ignored: {} is not an NGSI-LD broker", self.host2);
                None
            }
            None => None,
        };
        if self.skip_forwarding && source.ngsi_type == NgsiType::Ld {
            warning!("--skip-forwarding is ignored: {} is not an NGSIv2 broker", self.host);
        }

        let http = http_client()?;
        Ok(CopyCmd {
            source: BrokerClient::new(http.clone(), source_endpoint),
            destination: BrokerClient::new(http, destination_endpoint),
            route,
            entity_types: self.entity_types,
            run: self.run,
            skip_forwarding: self.skip_forwarding,
            at_context,
            previous_args: config
                .settings
                .use_previous_args
                .then(|| location.clone()),
        }
        .into_boxed())
    }
}
