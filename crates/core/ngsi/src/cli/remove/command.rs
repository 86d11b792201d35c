use crate::cli::remove::strategies::RemoveLd;
use crate::cli::remove::strategies::RemoveV1;
use crate::cli::remove::strategies::RemoveV2;
use crate::client::BrokerClient;
use crate::command::Command;
use crate::error::ReplicationError;
use crate::pagination::paginate;
use crate::pagination::Outcome;
use ngsi_config::NgsiConfigLocation;
use ngsi_config::PreviousArgs;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRoute {
    V2,
    /// NGSIv2 broker, legacy NGSIv1 API
    V1,
    Ld,
}

pub struct RemoveCmd {
    pub broker: BrokerClient,
    pub route: RemoveRoute,
    pub entity_types: Vec<String>,
    pub run: bool,
    pub skip_forwarding: bool,
    /// The broker selection to remember for the next remove
    pub previous_args: Option<(NgsiConfigLocation, PreviousArgs)>,
}

impl Command for RemoveCmd {
    fn description(&self) -> String {
        format!(
            "remove {} entities from {}",
            self.entity_types.join(","),
            self.broker.endpoint().url
        )
    }

    fn execute(&self) -> anyhow::Result<()> {
        if let Some((location, selection)) = &self.previous_args {
            selection.save(location)?;
        }
        self.remove_all(&mut std::io::stdout().lock())
    }
}

impl RemoveCmd {
    /// Remove the entity types one after the other, reporting the count of each on `out`
    pub fn remove_all(&self, out: &mut impl Write) -> anyhow::Result<()> {
        for entity_type in &self.entity_types {
            match self.remove(entity_type)? {
                Outcome::DryRun(count) => writeln!(
                    out,
                    "{count} entities will be removed. run remove with --run option"
                )?,
                Outcome::Done(count) => writeln!(out, "{count}")?,
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn remove(&self, entity_type: &str) -> Result<Outcome, ReplicationError> {
        let broker = &self.broker;
        match self.route {
            RemoveRoute::V2 => paginate(
                &RemoveV2 {
                    broker,
                    entity_type,
                    skip_forwarding: self.skip_forwarding,
                },
                self.run,
            ),
            RemoveRoute::V1 => paginate(
                &RemoveV1 {
                    broker,
                    entity_type,
                },
                self.run,
            ),
            RemoveRoute::Ld => paginate(
                &RemoveLd {
                    broker,
                    entity_type,
                },
                self.run,
            ),
        }
    }
}
