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
use crate::queries::delete_ld;
use crate::queries::fetch_ld;
use crate::queries::fetch_v2;
use crate::queries::query_v1;
use crate::queries::update_v1;
use crate::queries::Projection;
use bytes::Bytes;
use ngsi_api::json_v1::UpdateAction;
use ngsi_api::json_v1::V1UpdateRequest;
use ngsi_api::json_v2::decode_entities;
use ngsi_api::json_v2::BatchUpdate;

/// The number of entities removed with a page:
/// the first page is read again and again until nothing is left
fn removed(window: Window, total: usize) -> usize {
    total.min(window.limit)
}

pub struct RemoveV2<'a> {
    pub broker: &'a BrokerClient,
    pub entity_type: &'a str,
    pub skip_forwarding: bool,
}

impl PageStrategy for RemoveV2<'_> {
    type Page = Bytes;

    fn strategy(&self) -> Strategy {
        Strategy::RemoveV2
    }

    fn advance(&self) -> Advance {
        Advance::Restart
    }

    fn fetch(&self, window: Window) -> Result<Fetched<Bytes>, ReplicationError> {
        fetch_v2(
            self.broker,
            self.strategy(),
            self.entity_type,
            window,
            self.skip_forwarding,
            Projection::IdsOnly,
        )
    }

    fn apply(&self, window: Window, fetched: Fetched<Bytes>) -> Result<usize, ReplicationError> {
        let entities = decode_entities(&fetched.page).at(self.strategy(), Step::Decode)?;
        batch_update_v2(self.broker, self.strategy(), &BatchUpdate::delete(entities))?;
        Ok(removed(window, fetched.total))
    }
}

pub struct RemoveLd<'a> {
    pub broker: &'a BrokerClient,
    pub entity_type: &'a str,
}

impl PageStrategy for RemoveLd<'_> {
    type Page = Bytes;

    fn strategy(&self) -> Strategy {
        Strategy::RemoveLd
    }

    fn advance(&self) -> Advance {
        Advance::Restart
    }

    fn fetch(&self, window: Window) -> Result<Fetched<Bytes>, ReplicationError> {
        fetch_ld(
            self.broker,
            self.strategy(),
            self.entity_type,
            window,
            Projection::IdsOnly,
        )
    }

    fn apply(&self, window: Window, fetched: Fetched<Bytes>) -> Result<usize, ReplicationError> {
        let entities = decode_entities(&fetched.page).at(self.strategy(), Step::Decode)?;
        delete_ld(self.broker, self.strategy(), &entities)?;
        Ok(removed(window, fetched.total))
    }
}

/// Removal through the legacy NGSIv1 API of an NGSIv2 broker
pub struct RemoveV1<'a> {
    pub broker: &'a BrokerClient,
    pub entity_type: &'a str,
}

impl PageStrategy for RemoveV1<'_> {
    type Page = V1UpdateRequest;

    fn strategy(&self) -> Strategy {
        Strategy::RemoveV1
    }

    fn advance(&self) -> Advance {
        Advance::Restart
    }

    fn fetch(&self, window: Window) -> Result<Fetched<V1UpdateRequest>, ReplicationError> {
        query_v1(
            self.broker,
            self.strategy(),
            self.entity_type,
            window,
            UpdateAction::Delete,
        )
    }

    fn apply(
        &self,
        window: Window,
        fetched: Fetched<V1UpdateRequest>,
    ) -> Result<usize, ReplicationError> {
        update_v1(self.broker, self.strategy(), &fetched.page)?;
        Ok(removed(window, fetched.total))
    }
}
