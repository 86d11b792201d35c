use crate::cli::copy::strategies::CopyToLd;
use crate::cli::copy::strategies::CopyV1;
use crate::cli::copy::strategies::CopyV2;
use crate::client::BrokerClient;
use crate::command::Command;
use crate::error::ReplicationError;
use crate::pagination::paginate;
use crate::pagination::Outcome;
use crate::NgsiError;
use ngsi_api::at_context::AtContext;
use ngsi_api::NgsiType;
use ngsi_config::NgsiConfigLocation;
use ngsi_config::PreviousArgs;
use std::io::Write;

/// How entities travel from the source to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRoute {
    /// NGSIv2 to NGSIv2
    V2,
    /// NGSIv2 to NGSIv2 with the legacy NGSIv1 API
    V1,
    /// NGSIv2 to NGSI-LD, converting the entities
    V2ToLd,
    /// NGSI-LD to NGSI-LD
    Ld,
}

impl CopyRoute {
    pub fn select(
        source: NgsiType,
        destination: NgsiType,
        legacy_v1: bool,
    ) -> Result<Self, NgsiError> {
        match (source, destination) {
            (NgsiType::V2, NgsiType::V2) if legacy_v1 => Ok(CopyRoute::V1),
            (NgsiType::V2, NgsiType::V2) => Ok(CopyRoute::V2),
            (NgsiType::Ld, NgsiType::V2) => Err(NgsiError::LdToV2),
            _ if legacy_v1 => Err(NgsiError::V1OnLd),
            (NgsiType::V2, NgsiType::Ld) => Ok(CopyRoute::V2ToLd),
            (NgsiType::Ld, NgsiType::Ld) => Ok(CopyRoute::Ld),
        }
    }
}

pub struct CopyCmd {
    pub source: BrokerClient,
    pub destination: BrokerClient,
    pub route: CopyRoute,
    pub entity_types: Vec<String>,
    pub run: bool,
    pub skip_forwarding: bool,
    /// The `@context` set on the entities written to an NGSI-LD destination
    pub at_context: Option<AtContext>,
    /// Where the previous args are stored, if they are used at all
    pub previous_args: Option<NgsiConfigLocation>,
}

impl Command for CopyCmd {
    fn description(&self) -> String {
        format!(
            "copy {} entities from {} to {}",
            self.entity_types.join(","),
            self.source.endpoint().url,
            self.destination.endpoint().url
        )
    }

    fn execute(&self) -> anyhow::Result<()> {
        // A copy doesn't select a current broker for the next remove
        if let Some(location) = &self.previous_args {
            PreviousArgs::clear(location)?;
        }
        self.copy_all(&mut std::io::stdout().lock())
    }
}

impl CopyCmd {
    /// Copy the entity types one after the other, reporting the count of each on `out`
    pub fn copy_all(&self, out: &mut impl Write) -> anyhow::Result<()> {
        for entity_type in &self.entity_types {
            match self.copy(entity_type)? {
                Outcome::DryRun(count) => writeln!(
                    out,
                    "{count} entities will be copied. run copy with --run option"
                )?,
                Outcome::Done(count) => writeln!(out, "{count}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn copy(&self, entity_type: &str) -> Result<Outcome, ReplicationError> {
        let source = &self.source;
        let destination = &self.destination;
        match self.route {
            CopyRoute::V2 => paginate(
                &CopyV2 {
                    source,
                    destination,
                    entity_type,
                    skip_forwarding: self.skip_forwarding,
                },
                self.run,
            ),
            CopyRoute::V1 => paginate(
                &CopyV1 {
                    source,
                    destination,
                    entity_type,
                },
                self.run,
            ),
            CopyRoute::V2ToLd | CopyRoute::Ld => paginate(
                &CopyToLd {
                    source,
                    destination,
                    entity_type,
                    skip_forwarding: self.skip_forwarding,
                    from_v2: self.route == CopyRoute::V2ToLd,
                    at_context: self.at_context.as_ref(),
                },
                self.run,
            ),
        }
    }
}
