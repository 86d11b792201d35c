use crate::client::BrokerClient;
use crate::error::ReplicationError;
use crate::error::ResultExt;
use crate::error::Step;
use crate::error::Strategy;
use crate::pagination::Advance;
use crate::pagination::Fetched;
use crate::pagination::PageStrategy;
use crate::pagination::Window;
use crate::queries::batch_update_v2;
use crate::queries::create_ld;
use crate::queries::fetch_ld;
use crate::queries::fetch_v2;
use crate::queries::query_v1;
use crate::queries::update_v1;
use crate::queries::Projection;
use bytes::Bytes;
use ngsi_api::at_context::AtContext;
use ngsi_api::json_ld::normalized_to_ld;
use ngsi_api::json_v1::UpdateAction;
use ngsi_api::json_v1::V1UpdateRequest;
use ngsi_api::json_v2::decode_entities;
use ngsi_api::json_v2::BatchUpdate;

/// NGSIv2 to NGSIv2: entities are appended as they are
pub struct CopyV2<'a> {
    pub source: &'a BrokerClient,
    pub destination: &'a BrokerClient,
    pub entity_type: &'a str,
    pub skip_forwarding: bool,
}

impl PageStrategy for CopyV2<'_> {
    type Page = Bytes;

    fn strategy(&self) -> Strategy {
        Strategy::CopyV2
    }

    fn advance(&self) -> Advance {
        Advance::Offset
    }

    fn fetch(&self, window: Window) -> Result<Fetched<Bytes>, ReplicationError> {
        fetch_v2(
            self.source,
            self.strategy(),
            self.entity_type,
            window,
            self.skip_forwarding,
            Projection::Full,
        )
    }

    fn apply(&self, _window: Window, fetched: Fetched<Bytes>) -> Result<usize, ReplicationError> {
        let entities = decode_entities(&fetched.page).at(self.strategy(), Step::Decode)?;
        let count = entities.len();
        batch_update_v2(self.destination, self.strategy(), &BatchUpdate::append(entities))?;
        Ok(count)
    }
}

/// NGSIv2 or NGSI-LD to NGSI-LD: NGSIv2 entities are converted, NGSI-LD entities are passed through
pub struct CopyToLd<'a> {
    pub source: &'a BrokerClient,
    pub destination: &'a BrokerClient,
    pub entity_type: &'a str,
    pub skip_forwarding: bool,
    pub from_v2: bool,
    pub at_context: Option<&'a AtContext>,
}

impl PageStrategy for CopyToLd<'_> {
    type Page = Bytes;

    fn strategy(&self) -> Strategy {
        if self.from_v2 {
            Strategy::CopyV2ToLd
        } else {
            Strategy::CopyLd
        }
    }

    fn advance(&self) -> Advance {
        Advance::Offset
    }

    fn fetch(&self, window: Window) -> Result<Fetched<Bytes>, ReplicationError> {
        if self.from_v2 {
            fetch_v2(
                self.source,
                self.strategy(),
                self.entity_type,
                window,
                self.skip_forwarding,
                Projection::Full,
            )
        } else {
            fetch_ld(
                self.source,
                self.strategy(),
                self.entity_type,
                window,
                Projection::Full,
            )
        }
    }

    fn apply(&self, window: Window, fetched: Fetched<Bytes>) -> Result<usize, ReplicationError> {
        if self.from_v2 {
            let (entities, count) =
                normalized_to_ld(&fetched.page).at(self.strategy(), Step::Transcode)?;
            create_ld(
                self.destination,
                self.strategy(),
                &entities,
                self.at_context,
            )?;
            return Ok(count);
        }

        create_ld(
            self.destination,
            self.strategy(),
            &fetched.page,
            self.at_context,
        )?;

        // The bulk create response has no count: use the page share of the count reported by the source
        Ok(fetched
            .total
            .saturating_sub(window.offset)
            .min(window.limit))
    }
}

/// NGSIv2 to NGSIv2 through the legacy NGSIv1 API
pub struct CopyV1<'a> {
    pub source: &'a BrokerClient,
    pub destination: &'a BrokerClient,
    pub entity_type: &'a str,
}

impl PageStrategy for CopyV1<'_> {
    type Page = V1UpdateRequest;

    fn strategy(&self) -> Strategy {
        Strategy::CopyV1
    }

    fn advance(&self) -> Advance {
        Advance::Offset
    }

    fn fetch(&self, window: Window) -> Result<Fetched<V1UpdateRequest>, ReplicationError> {
        query_v1(
            self.source,
            self.strategy(),
            self.entity_type,
            window,
            UpdateAction::Append,
        )
    }

    fn apply(
        &self,
        _window: Window,
        fetched: Fetched<V1UpdateRequest>,
    ) -> Result<usize, ReplicationError> {
        update_v1(self.destination, self.strategy(), &fetched.page)
    }
}
