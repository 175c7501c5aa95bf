//! Beacon node REST schemas.
//!
//! JSON keys are the public REST names; annotations describe how each leaf
//! differs on the RPC side.

use crate::transform::{Field, Schema};

// ---------------
// Enumerations.
// ---------------

pub const VALIDATOR_STATUSES: &[&str] = &[
    "pending_initialized",
    "pending_queued",
    "active_ongoing",
    "active_exiting",
    "active_slashed",
    "exited_unslashed",
    "exited_slashed",
    "withdrawal_possible",
    "withdrawal_done",
];

/// Statuses accepted by the validators query filter, including the
/// top-level groups.
pub const VALIDATOR_STATUS_FILTERS: &[&str] = &[
    "pending_initialized",
    "pending_queued",
    "active_ongoing",
    "active_exiting",
    "active_slashed",
    "exited_unslashed",
    "exited_slashed",
    "withdrawal_possible",
    "withdrawal_done",
    "active",
    "pending",
    "exited",
    "withdrawal",
];

pub const PEER_STATES: &[&str] = &["disconnected", "connecting", "connected", "disconnecting"];

pub const PEER_DIRECTIONS: &[&str] = &["inbound", "outbound"];

// ---------------
// Reusable types.
// ---------------

pub static CHECKPOINT: Schema = Schema::new("checkpoint", &[Field::plain("epoch"), Field::hex("root")]);

pub static FORK: Schema = Schema::new(
    "fork",
    &[
        Field::hex("previous_version"),
        Field::hex("current_version"),
        Field::plain("epoch"),
    ],
);

pub static ETH1_DATA: Schema = Schema::new(
    "eth1_data",
    &[
        Field::hex("deposit_root"),
        Field::plain("deposit_count"),
        Field::hex("block_hash"),
    ],
);

pub static BEACON_BLOCK_HEADER: Schema = Schema::new(
    "beacon_block_header",
    &[
        Field::plain("slot"),
        Field::plain("proposer_index"),
        Field::hex("parent_root"),
        Field::hex("state_root"),
        Field::hex("body_root"),
    ],
);

pub static SIGNED_BEACON_BLOCK_HEADER: Schema = Schema::new(
    "signed_beacon_block_header",
    &[Field::object("message", &BEACON_BLOCK_HEADER), Field::hex("signature")],
);

pub static ATTESTATION_DATA: Schema = Schema::new(
    "attestation_data",
    &[
        Field::plain("slot"),
        Field::plain("index"),
        Field::hex("beacon_block_root"),
        Field::object("source", &CHECKPOINT),
        Field::object("target", &CHECKPOINT),
    ],
);

pub static ATTESTATION: Schema = Schema::new(
    "attestation",
    &[
        Field::hex("aggregation_bits"),
        Field::object("data", &ATTESTATION_DATA),
        Field::hex("signature"),
    ],
);

pub static INDEXED_ATTESTATION: Schema = Schema::new(
    "indexed_attestation",
    &[
        Field::plain("attesting_indices").list(),
        Field::object("data", &ATTESTATION_DATA),
        Field::hex("signature"),
    ],
);

pub static PENDING_ATTESTATION: Schema = Schema::new(
    "pending_attestation",
    &[
        Field::hex("aggregation_bits"),
        Field::object("data", &ATTESTATION_DATA),
        Field::plain("inclusion_delay"),
        Field::plain("proposer_index"),
    ],
);

pub static PROPOSER_SLASHING: Schema = Schema::new(
    "proposer_slashing",
    &[
        Field::object("signed_header_1", &SIGNED_BEACON_BLOCK_HEADER),
        Field::object("signed_header_2", &SIGNED_BEACON_BLOCK_HEADER),
    ],
);

pub static ATTESTER_SLASHING: Schema = Schema::new(
    "attester_slashing",
    &[
        Field::object("attestation_1", &INDEXED_ATTESTATION),
        Field::object("attestation_2", &INDEXED_ATTESTATION),
    ],
);

pub static DEPOSIT_DATA: Schema = Schema::new(
    "deposit_data",
    &[
        Field::hex("pubkey"),
        Field::hex("withdrawal_credentials"),
        Field::plain("amount"),
        Field::hex("signature"),
    ],
);

pub static DEPOSIT: Schema = Schema::new(
    "deposit",
    &[Field::hex("proof").list(), Field::object("data", &DEPOSIT_DATA)],
);

pub static VOLUNTARY_EXIT: Schema = Schema::new(
    "voluntary_exit",
    &[Field::plain("epoch"), Field::plain("validator_index")],
);

pub static SIGNED_VOLUNTARY_EXIT: Schema = Schema::new(
    "signed_voluntary_exit",
    &[Field::object("message", &VOLUNTARY_EXIT), Field::hex("signature")],
);

pub static BEACON_BLOCK_BODY: Schema = Schema::new(
    "beacon_block_body",
    &[
        Field::hex("randao_reveal"),
        Field::object("eth1_data", &ETH1_DATA),
        Field::hex("graffiti"),
        Field::object("proposer_slashings", &PROPOSER_SLASHING).list(),
        Field::object("attester_slashings", &ATTESTER_SLASHING).list(),
        Field::object("attestations", &ATTESTATION).list(),
        Field::object("deposits", &DEPOSIT).list(),
        Field::object("voluntary_exits", &SIGNED_VOLUNTARY_EXIT).list(),
    ],
);

pub static BEACON_BLOCK: Schema = Schema::new(
    "beacon_block",
    &[
        Field::plain("slot"),
        Field::plain("proposer_index"),
        Field::hex("parent_root"),
        Field::hex("state_root"),
        Field::object("body", &BEACON_BLOCK_BODY),
    ],
);

pub static SIGNED_BEACON_BLOCK: Schema = Schema::new(
    "signed_beacon_block",
    &[Field::object("message", &BEACON_BLOCK), Field::hex("signature")],
);

pub static BLOCK_HEADER_CONTAINER: Schema = Schema::new(
    "block_header_container",
    &[
        Field::hex("root"),
        Field::plain("canonical"),
        Field::object("header", &SIGNED_BEACON_BLOCK_HEADER),
    ],
);

pub static ROOT: Schema = Schema::new("root", &[Field::hex("root")]);

pub static VALIDATOR: Schema = Schema::new(
    "validator",
    &[
        Field::hex("pubkey"),
        Field::hex("withdrawal_credentials"),
        Field::plain("effective_balance"),
        Field::plain("slashed"),
        Field::plain("activation_eligibility_epoch"),
        Field::plain("activation_epoch"),
        Field::plain("exit_epoch"),
        Field::plain("withdrawable_epoch"),
    ],
);

pub static VALIDATOR_CONTAINER: Schema = Schema::new(
    "validator_container",
    &[
        Field::plain("index"),
        Field::plain("balance"),
        Field::enumerated("status", VALIDATOR_STATUSES),
        Field::object("validator", &VALIDATOR),
    ],
);

pub static VALIDATOR_BALANCE: Schema = Schema::new(
    "validator_balance",
    &[Field::plain("index"), Field::plain("balance")],
);

pub static COMMITTEE: Schema = Schema::new(
    "committee",
    &[
        Field::plain("index"),
        Field::plain("slot"),
        Field::plain("validators").list(),
    ],
);

pub static METADATA: Schema = Schema::new(
    "metadata",
    &[Field::plain("seq_number"), Field::hex("attnets")],
);

pub static IDENTITY: Schema = Schema::new(
    "identity",
    &[
        Field::plain("peer_id"),
        Field::plain("enr"),
        Field::plain("p2p_addresses").list(),
        Field::plain("discovery_addresses").list(),
        Field::object("metadata", &METADATA),
    ],
);

pub static PEER: Schema = Schema::new(
    "peer",
    &[
        Field::plain("peer_id"),
        Field::plain("enr"),
        Field::plain("last_seen_p2p_address"),
        Field::enumerated("state", PEER_STATES),
        Field::enumerated("direction", PEER_DIRECTIONS),
    ],
);

pub static PEER_COUNT: Schema = Schema::new(
    "peer_count",
    &[
        Field::plain("disconnected"),
        Field::plain("connecting"),
        Field::plain("connected"),
        Field::plain("disconnecting"),
    ],
);

pub static VERSION: Schema = Schema::new("version", &[Field::plain("version")]);

pub static SYNC_INFO: Schema = Schema::new(
    "sync_info",
    &[
        Field::plain("head_slot"),
        Field::plain("sync_distance"),
        Field::plain("is_syncing"),
    ],
);

pub static BEACON_STATE: Schema = Schema::new(
    "beacon_state",
    &[
        Field::plain("genesis_time"),
        Field::hex("genesis_validators_root"),
        Field::plain("slot"),
        Field::object("fork", &FORK),
        Field::object("latest_block_header", &BEACON_BLOCK_HEADER),
        Field::hex("block_roots").list(),
        Field::hex("state_roots").list(),
        Field::hex("historical_roots").list(),
        Field::object("eth1_data", &ETH1_DATA),
        Field::object("eth1_data_votes", &ETH1_DATA).list(),
        Field::plain("eth1_deposit_index"),
        Field::object("validators", &VALIDATOR).list(),
        Field::plain("balances").list(),
        Field::hex("randao_mixes").list(),
        Field::plain("slashings").list(),
        Field::object("previous_epoch_attestations", &PENDING_ATTESTATION).list(),
        Field::object("current_epoch_attestations", &PENDING_ATTESTATION).list(),
        Field::hex("justification_bits"),
        Field::object("previous_justified_checkpoint", &CHECKPOINT),
        Field::object("current_justified_checkpoint", &CHECKPOINT),
        Field::object("finalized_checkpoint", &CHECKPOINT),
    ],
);

pub static FORK_CHOICE_HEAD: Schema = Schema::new(
    "fork_choice_head",
    &[Field::hex("root"), Field::plain("slot")],
);

pub static DEPOSIT_CONTRACT: Schema = Schema::new(
    "deposit_contract",
    &[Field::plain("chain_id"), Field::plain("address")],
);

pub static ATTESTER_DUTY: Schema = Schema::new(
    "attester_duty",
    &[
        Field::hex("pubkey"),
        Field::plain("validator_index"),
        Field::plain("committee_index"),
        Field::plain("committee_length"),
        Field::plain("committees_at_slot"),
        Field::plain("validator_committee_index"),
        Field::plain("slot"),
    ],
);

pub static PROPOSER_DUTY: Schema = Schema::new(
    "proposer_duty",
    &[
        Field::hex("pubkey"),
        Field::plain("validator_index"),
        Field::plain("slot"),
    ],
);

pub static AGGREGATE_ATTESTATION_AND_PROOF: Schema = Schema::new(
    "aggregate_attestation_and_proof",
    &[
        Field::plain("aggregator_index"),
        Field::object("aggregate", &ATTESTATION),
        Field::hex("selection_proof"),
    ],
);

pub static SIGNED_AGGREGATE_ATTESTATION_AND_PROOF: Schema = Schema::new(
    "signed_aggregate_attestation_and_proof",
    &[
        Field::object("message", &AGGREGATE_ATTESTATION_AND_PROOF),
        Field::hex("signature"),
    ],
);

pub static BEACON_COMMITTEE_SUBSCRIPTION: Schema = Schema::new(
    "beacon_committee_subscription",
    &[
        Field::plain("validator_index"),
        Field::plain("committee_index"),
        Field::plain("committees_at_slot"),
        Field::plain("slot"),
        Field::plain("is_aggregator"),
    ],
);

// ---------------
// Responses.
// ---------------

pub static GENESIS: Schema = Schema::new(
    "genesis",
    &[
        Field::time("genesis_time"),
        Field::hex("genesis_validators_root"),
        Field::hex("genesis_fork_version"),
    ],
);

pub static GENESIS_RESPONSE: Schema = Schema::new("genesis_response", &[Field::object("data", &GENESIS)]);

pub static STATE_ROOT_RESPONSE: Schema = Schema::new("state_root_response", &[Field::object("data", &ROOT)]);

pub static STATE_FORK_RESPONSE: Schema = Schema::new("state_fork_response", &[Field::object("data", &FORK)]);

pub static FINALITY_CHECKPOINTS: Schema = Schema::new(
    "finality_checkpoints",
    &[
        Field::object("previous_justified", &CHECKPOINT),
        Field::object("current_justified", &CHECKPOINT),
        Field::object("finalized", &CHECKPOINT),
    ],
);

pub static STATE_FINALITY_CHECKPOINTS_RESPONSE: Schema = Schema::new(
    "state_finality_checkpoints_response",
    &[Field::object("data", &FINALITY_CHECKPOINTS)],
);

pub static STATE_VALIDATORS_RESPONSE: Schema = Schema::new(
    "state_validators_response",
    &[Field::object("data", &VALIDATOR_CONTAINER).list()],
);

pub static STATE_VALIDATOR_RESPONSE: Schema = Schema::new(
    "state_validator_response",
    &[Field::object("data", &VALIDATOR_CONTAINER)],
);

pub static VALIDATOR_BALANCES_RESPONSE: Schema = Schema::new(
    "validator_balances_response",
    &[Field::object("data", &VALIDATOR_BALANCE).list()],
);

pub static STATE_COMMITTEES_RESPONSE: Schema = Schema::new(
    "state_committees_response",
    &[Field::object("data", &COMMITTEE).list()],
);

pub static BLOCK_HEADERS_RESPONSE: Schema = Schema::new(
    "block_headers_response",
    &[Field::object("data", &BLOCK_HEADER_CONTAINER).list()],
);

pub static BLOCK_HEADER_RESPONSE: Schema = Schema::new(
    "block_header_response",
    &[Field::object("data", &BLOCK_HEADER_CONTAINER)],
);

pub static BLOCK_RESPONSE: Schema = Schema::new("block_response", &[Field::object("data", &SIGNED_BEACON_BLOCK)]);

pub static BLOCK_ROOT_RESPONSE: Schema = Schema::new("block_root_response", &[Field::object("data", &ROOT)]);

pub static ATTESTATIONS_RESPONSE: Schema = Schema::new(
    "attestations_response",
    &[Field::object("data", &ATTESTATION).list()],
);

pub static SUBMIT_ATTESTATIONS_REQUEST: Schema = Schema::new(
    "submit_attestations_request",
    &[Field::object("data", &ATTESTATION).list()],
);

pub static ATTESTER_SLASHINGS_POOL_RESPONSE: Schema = Schema::new(
    "attester_slashings_pool_response",
    &[Field::object("data", &ATTESTER_SLASHING).list()],
);

pub static PROPOSER_SLASHINGS_POOL_RESPONSE: Schema = Schema::new(
    "proposer_slashings_pool_response",
    &[Field::object("data", &PROPOSER_SLASHING).list()],
);

pub static VOLUNTARY_EXITS_POOL_RESPONSE: Schema = Schema::new(
    "voluntary_exits_pool_response",
    &[Field::object("data", &SIGNED_VOLUNTARY_EXIT).list()],
);

pub static IDENTITY_RESPONSE: Schema = Schema::new("identity_response", &[Field::object("data", &IDENTITY)]);

pub static PEERS_RESPONSE: Schema = Schema::new("peers_response", &[Field::object("data", &PEER).list()]);

pub static PEER_RESPONSE: Schema = Schema::new("peer_response", &[Field::object("data", &PEER)]);

pub static PEER_COUNT_RESPONSE: Schema = Schema::new("peer_count_response", &[Field::object("data", &PEER_COUNT)]);

pub static VERSION_RESPONSE: Schema = Schema::new("version_response", &[Field::object("data", &VERSION)]);

pub static SYNCING_RESPONSE: Schema = Schema::new("syncing_response", &[Field::object("data", &SYNC_INFO)]);

pub static BEACON_STATE_RESPONSE: Schema = Schema::new(
    "beacon_state_response",
    &[Field::object("data", &BEACON_STATE)],
);

pub static FORK_CHOICE_HEADS_RESPONSE: Schema = Schema::new(
    "fork_choice_heads_response",
    &[Field::object("data", &FORK_CHOICE_HEAD).list()],
);

pub static FORK_SCHEDULE_RESPONSE: Schema = Schema::new(
    "fork_schedule_response",
    &[Field::object("data", &FORK).list()],
);

pub static DEPOSIT_CONTRACT_RESPONSE: Schema = Schema::new(
    "deposit_contract_response",
    &[Field::object("data", &DEPOSIT_CONTRACT)],
);

pub static SPEC_RESPONSE: Schema = Schema::new("spec_response", &[Field::any("data")]);

pub static ATTESTER_DUTIES_REQUEST: Schema = Schema::new(
    "attester_duties_request",
    &[Field::plain("index").list()],
);

pub static ATTESTER_DUTIES_RESPONSE: Schema = Schema::new(
    "attester_duties_response",
    &[
        Field::hex("dependent_root"),
        Field::object("data", &ATTESTER_DUTY).list(),
    ],
);

pub static PROPOSER_DUTIES_RESPONSE: Schema = Schema::new(
    "proposer_duties_response",
    &[
        Field::hex("dependent_root"),
        Field::object("data", &PROPOSER_DUTY).list(),
    ],
);

pub static PRODUCE_BLOCK_RESPONSE: Schema = Schema::new(
    "produce_block_response",
    &[Field::object("data", &BEACON_BLOCK)],
);

pub static ATTESTATION_DATA_RESPONSE: Schema = Schema::new(
    "attestation_data_response",
    &[Field::object("data", &ATTESTATION_DATA)],
);

pub static AGGREGATE_ATTESTATION_RESPONSE: Schema = Schema::new(
    "aggregate_attestation_response",
    &[Field::object("data", &ATTESTATION)],
);

pub static SUBMIT_COMMITTEE_SUBSCRIPTIONS_REQUEST: Schema = Schema::new(
    "submit_committee_subscriptions_request",
    &[Field::object("data", &BEACON_COMMITTEE_SUBSCRIPTION).list()],
);

pub static SUBMIT_AGGREGATE_AND_PROOFS_REQUEST: Schema = Schema::new(
    "submit_aggregate_and_proofs_request",
    &[Field::object("data", &SIGNED_AGGREGATE_ATTESTATION_AND_PROOF).list()],
);

// ---------------
// Events.
// ---------------

pub static EVENT_HEAD: Schema = Schema::new(
    "event_head",
    &[
        Field::plain("slot"),
        Field::hex("block"),
        Field::hex("state"),
        Field::plain("epoch_transition"),
        Field::hex("previous_duty_dependent_root"),
        Field::hex("current_duty_dependent_root"),
    ],
);

pub static EVENT_BLOCK: Schema = Schema::new("event_block", &[Field::plain("slot"), Field::hex("block")]);

pub static EVENT_FINALIZED_CHECKPOINT: Schema = Schema::new(
    "event_finalized_checkpoint",
    &[Field::hex("block"), Field::hex("state"), Field::plain("epoch")],
);

/// Keyed by the public JSON names. The RPC-side field labels for the
/// old/new head block and state do not line up with these keys; the keys
/// are what clients see and are kept as-is.
pub static EVENT_CHAIN_REORG: Schema = Schema::new(
    "event_chain_reorg",
    &[
        Field::plain("slot"),
        Field::plain("depth"),
        Field::hex("old_head_block"),
        Field::hex("old_head_state"),
        Field::hex("new_head_block"),
        Field::hex("new_head_state"),
        Field::plain("epoch"),
    ],
);

pub static EVENT_ERROR: Schema = Schema::new(
    "event_error",
    &[Field::plain("status_code"), Field::plain("message")],
);

// ---------------
// Error handling.
// ---------------

pub static ATTESTATION_FAILURE: Schema = Schema::new(
    "attestation_failure",
    &[Field::plain("index"), Field::plain("message")],
);

/// Default `{code, message}` plus per-attestation failures.
pub static SUBMIT_ATTESTATIONS_ERROR: Schema = Schema::new(
    "submit_attestations_error",
    &[
        Field::plain("code"),
        Field::plain("message"),
        Field::object("failures", &ATTESTATION_FAILURE).list(),
    ],
);
