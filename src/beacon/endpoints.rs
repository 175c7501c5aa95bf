//! Beacon node endpoint catalogue.

use crate::beacon::hooks::{prepare_graffiti, wrap_data_array, wrap_index_array};
use crate::beacon::schemas::*;
use crate::endpoint::{BinaryPassthrough, Endpoint, Override, QueryParam, StaticRegistry};

/// Every proxied beacon API endpoint.
pub fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("/eth/v1/beacon/genesis").get_response(&GENESIS_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/root").get_response(&STATE_ROOT_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/fork").get_response(&STATE_FORK_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/finality_checkpoints")
            .get_response(&STATE_FINALITY_CHECKPOINTS_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/validators")
            .query_params(&[
                QueryParam::hex("id"),
                QueryParam::enumerated("status", VALIDATOR_STATUS_FILTERS),
            ])
            .get_response(&STATE_VALIDATORS_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/validators/{validator_id}")
            .get_response(&STATE_VALIDATOR_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/validator_balances")
            .query_params(&[QueryParam::hex("id")])
            .get_response(&VALIDATOR_BALANCES_RESPONSE),
        Endpoint::new("/eth/v1/beacon/states/{state_id}/committees")
            .query_params(&[
                QueryParam::plain("epoch"),
                QueryParam::plain("index"),
                QueryParam::plain("slot"),
            ])
            .get_response(&STATE_COMMITTEES_RESPONSE),
        Endpoint::new("/eth/v1/beacon/headers")
            .query_params(&[QueryParam::plain("slot"), QueryParam::hex("parent_root")])
            .get_response(&BLOCK_HEADERS_RESPONSE),
        Endpoint::new("/eth/v1/beacon/headers/{block_id}").get_response(&BLOCK_HEADER_RESPONSE),
        Endpoint::new("/eth/v1/beacon/blocks")
            .post_request(&SIGNED_BEACON_BLOCK)
            .post_deserialize(prepare_graffiti),
        Endpoint::new("/eth/v1/beacon/blocks/{block_id}")
            .get_response(&BLOCK_RESPONSE)
            .with_override(Override::Binary(BinaryPassthrough {
                backend_path: "/eth/v1/beacon/blocks/{block_id}/ssz",
                file_name: "beacon_block.ssz",
            })),
        Endpoint::new("/eth/v1/beacon/blocks/{block_id}/root").get_response(&BLOCK_ROOT_RESPONSE),
        Endpoint::new("/eth/v1/beacon/blocks/{block_id}/attestations").get_response(&ATTESTATIONS_RESPONSE),
        Endpoint::new("/eth/v1/beacon/pool/attestations")
            .query_params(&[QueryParam::plain("slot"), QueryParam::plain("committee_index")])
            .get_response(&ATTESTATIONS_RESPONSE)
            .post_request(&SUBMIT_ATTESTATIONS_REQUEST)
            .error(&SUBMIT_ATTESTATIONS_ERROR)
            .pre_deserialize(wrap_data_array),
        Endpoint::new("/eth/v1/beacon/pool/attester_slashings")
            .post_request(&ATTESTER_SLASHING)
            .get_response(&ATTESTER_SLASHINGS_POOL_RESPONSE),
        Endpoint::new("/eth/v1/beacon/pool/proposer_slashings")
            .post_request(&PROPOSER_SLASHING)
            .get_response(&PROPOSER_SLASHINGS_POOL_RESPONSE),
        Endpoint::new("/eth/v1/beacon/pool/voluntary_exits")
            .post_request(&SIGNED_VOLUNTARY_EXIT)
            .get_response(&VOLUNTARY_EXITS_POOL_RESPONSE),
        Endpoint::new("/eth/v1/node/identity").get_response(&IDENTITY_RESPONSE),
        Endpoint::new("/eth/v1/node/peers")
            .query_params(&[
                QueryParam::enumerated("state", PEER_STATES),
                QueryParam::enumerated("direction", PEER_DIRECTIONS),
            ])
            .get_response(&PEERS_RESPONSE),
        Endpoint::new("/eth/v1/node/peers/{peer_id}")
            .url_literals(&["peer_id"])
            .get_response(&PEER_RESPONSE),
        Endpoint::new("/eth/v1/node/peer_count").get_response(&PEER_COUNT_RESPONSE),
        Endpoint::new("/eth/v1/node/version").get_response(&VERSION_RESPONSE),
        Endpoint::new("/eth/v1/node/syncing").get_response(&SYNCING_RESPONSE),
        Endpoint::new("/eth/v1/node/health"),
        Endpoint::new("/eth/v1/debug/beacon/states/{state_id}")
            .get_response(&BEACON_STATE_RESPONSE)
            .with_override(Override::Binary(BinaryPassthrough {
                backend_path: "/eth/v1/debug/beacon/states/{state_id}/ssz",
                file_name: "beacon_state.ssz",
            })),
        Endpoint::new("/eth/v1/debug/beacon/heads").get_response(&FORK_CHOICE_HEADS_RESPONSE),
        Endpoint::new("/eth/v1/config/fork_schedule").get_response(&FORK_SCHEDULE_RESPONSE),
        Endpoint::new("/eth/v1/config/deposit_contract").get_response(&DEPOSIT_CONTRACT_RESPONSE),
        Endpoint::new("/eth/v1/config/spec").get_response(&SPEC_RESPONSE),
        Endpoint::new("/eth/v1/events").with_override(Override::EventStream),
        Endpoint::new("/eth/v1/validator/duties/attester/{epoch}")
            .post_request(&ATTESTER_DUTIES_REQUEST)
            .post_response(&ATTESTER_DUTIES_RESPONSE)
            .url_literals(&["epoch"])
            .pre_deserialize(wrap_index_array),
        Endpoint::new("/eth/v1/validator/duties/proposer/{epoch}")
            .get_response(&PROPOSER_DUTIES_RESPONSE)
            .url_literals(&["epoch"]),
        Endpoint::new("/eth/v1/validator/blocks/{slot}")
            .get_response(&PRODUCE_BLOCK_RESPONSE)
            .url_literals(&["slot"])
            .query_params(&[QueryParam::hex("randao_reveal"), QueryParam::hex("graffiti")]),
        Endpoint::new("/eth/v1/validator/attestation_data")
            .get_response(&ATTESTATION_DATA_RESPONSE)
            .query_params(&[QueryParam::plain("slot"), QueryParam::plain("committee_index")]),
        Endpoint::new("/eth/v1/validator/aggregate_attestation")
            .get_response(&AGGREGATE_ATTESTATION_RESPONSE)
            .query_params(&[QueryParam::hex("attestation_data_root"), QueryParam::plain("slot")]),
        Endpoint::new("/eth/v1/validator/beacon_committee_subscriptions")
            .post_request(&SUBMIT_COMMITTEE_SUBSCRIPTIONS_REQUEST)
            .pre_deserialize(wrap_data_array),
        Endpoint::new("/eth/v1/validator/aggregate_and_proofs")
            .post_request(&SUBMIT_AGGREGATE_AND_PROOFS_REQUEST)
            .pre_deserialize(wrap_data_array),
    ]
}

/// Registry holding the full beacon catalogue.
pub fn registry() -> StaticRegistry {
    StaticRegistry::new(endpoints())
}
