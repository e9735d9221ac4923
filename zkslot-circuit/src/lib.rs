// zkslot/zkslot-circuit/src/lib.rs
// Numan Thabit 2025

pub mod api;
pub mod bytes;
pub mod check;
pub mod error;
pub mod gadgets;
pub mod observer;
pub mod output;
pub mod readings;
pub mod word;

use std::sync::Arc;

use halo2_base::{
    gates::circuit::{
        builder::BaseCircuitBuilder, BaseCircuitParams, BaseConfig, CircuitBuilderStage,
    },
    AssignedValue,
};
use halo2_proofs_axiom::{
    circuit::{Layouter, SimpleFloorPlanner},
    plonk::{Circuit, ConstraintSystem, Error},
};
use halo2curves_axiom::bn256::Fr;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use crate::{
    api::{CircuitApi, Halo2Api, NativeApi},
    bytes::{Address, Bytes32},
    check::{Allocation, Built, LiquidityCheck, Unbuilt, REQUIRED_STORAGE_READINGS},
    error::CircuitError,
    observer::{TracingObserver, WitnessObserver},
    output::{public_instances, PublicOutput, NUM_INSTANCE_COLUMNS, PACKED_OUTPUT_LEN},
    readings::{StorageReading, StorageReadings},
    word::SlotWord,
};

pub const DEFAULT_K: usize = 12;
const DEFAULT_LOOKUP_BITS: usize = 8;
const DEFAULT_ADVICE_PER_PHASE: usize = 2;
const DEFAULT_FIXED_COLUMNS: usize = 1;
const DEFAULT_LOOKUP_ADVICE_PER_PHASE: usize = 1;

pub fn default_params() -> BaseCircuitParams {
    BaseCircuitParams {
        k: DEFAULT_K,
        num_advice_per_phase: vec![DEFAULT_ADVICE_PER_PHASE],
        num_fixed: DEFAULT_FIXED_COLUMNS,
        num_lookup_advice_per_phase: vec![DEFAULT_LOOKUP_ADVICE_PER_PHASE],
        lookup_bits: Some(DEFAULT_LOOKUP_BITS),
        num_instance_columns: NUM_INSTANCE_COLUMNS,
    }
}

/// Everything one proof is about: the two readings and the two public constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotComparisonInput {
    pub readings: StorageReadings,
    pub challenger_address: Bytes32,
    pub order_hash: Bytes32,
}

impl SlotComparisonInput {
    fn check(&self) -> LiquidityCheck<Unbuilt> {
        LiquidityCheck::new(self.challenger_address, self.order_hash)
    }

    /// Evaluates the definition natively and returns the outputs a valid proof carries.
    pub fn expected_output(&self) -> Result<PublicOutput, CircuitError> {
        let mut api = NativeApi::new();
        self.check().define(&mut api, &self.readings)?;
        api.into_public_output()
    }
}

#[derive(Clone, Debug)]
pub struct SlotComparisonCircuit {
    pub input: Option<SlotComparisonInput>,
    params: BaseCircuitParams,
    stage: CircuitBuilderStage,
    observer: Option<Arc<dyn WitnessObserver>>,
}

impl Default for SlotComparisonCircuit {
    fn default() -> Self {
        Self {
            input: None,
            params: default_params(),
            stage: CircuitBuilderStage::Keygen,
            observer: None,
        }
    }
}

impl SlotComparisonCircuit {
    /// Circuit for keygen (`None`) or for proving/mock runs (`Some`).
    ///
    /// Proving also uses the mock builder stage, which needs no precomputed break points.
    pub fn new(input: Option<SlotComparisonInput>) -> Self {
        let stage = if input.is_some() {
            CircuitBuilderStage::Mock
        } else {
            CircuitBuilderStage::Keygen
        };
        Self {
            input,
            params: default_params(),
            stage,
            observer: None,
        }
    }

    pub fn with_params(mut self, params: BaseCircuitParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn WitnessObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl Circuit<Fr> for SlotComparisonCircuit {
    type Config = BaseConfig<Fr>;
    type FloorPlanner = SimpleFloorPlanner;
    type Params = BaseCircuitParams;

    fn params(&self) -> Self::Params {
        self.params.clone()
    }

    fn without_witnesses(&self) -> Self {
        Self {
            input: None,
            params: self.params.clone(),
            stage: CircuitBuilderStage::Keygen,
            observer: None,
        }
    }

    fn configure_with_params(
        meta: &mut ConstraintSystem<Fr>,
        params: Self::Params,
    ) -> Self::Config {
        BaseConfig::configure(meta, params)
    }

    fn configure(_: &mut ConstraintSystem<Fr>) -> Self::Config {
        unreachable!("SlotComparisonCircuit must be configured with explicit parameters")
    }

    fn synthesize(&self, config: Self::Config, layouter: impl Layouter<Fr>) -> Result<(), Error> {
        let input = self.input.as_ref().unwrap_or(&KEYGEN_INPUT);

        let mut builder = BaseCircuitBuilder::<Fr>::from_stage(self.stage)
            .use_params(self.params.clone())
            .use_instance_columns(self.params.num_instance_columns);

        if let Some(bits) = self.params.lookup_bits {
            builder = builder.use_lookup_bits(bits);
        }

        build_constraints(&mut builder, input, self.observer.clone()).map_err(|err| {
            tracing::error!(%err, "slot comparison circuit definition failed");
            Error::Synthesis
        })?;
        <BaseCircuitBuilder<Fr> as Circuit<Fr>>::synthesize(&builder, config, layouter)
    }
}

/// Shape-only input for keygen. Witness values are irrelevant there, only the layout.
static KEYGEN_INPUT: Lazy<SlotComparisonInput> = Lazy::new(|| {
    let reading = StorageReading::new(0, Address::default(), Bytes32::ZERO, Bytes32::ZERO);
    SlotComparisonInput {
        readings: StorageReadings::new(vec![reading; REQUIRED_STORAGE_READINGS]),
        challenger_address: Bytes32::ZERO,
        order_hash: Bytes32::ZERO,
    }
});

fn build_constraints(
    builder: &mut BaseCircuitBuilder<Fr>,
    input: &SlotComparisonInput,
    observer: Option<Arc<dyn WitnessObserver>>,
) -> Result<(), CircuitError> {
    let range = builder.range_chip();
    let ctx = builder.main(0);

    let mut check = input.check();
    if let Some(observer) = observer {
        check = check.with_observer(observer);
    }

    let mut api = Halo2Api::new(ctx, &range);
    check.define(&mut api, &input.readings)?;
    let outputs = api.into_outputs();

    expose_public_outputs(builder, outputs)
}

fn expose_public_outputs(
    builder: &mut BaseCircuitBuilder<Fr>,
    values: Vec<AssignedValue<Fr>>,
) -> Result<(), CircuitError> {
    if values.len() != NUM_INSTANCE_COLUMNS {
        return Err(CircuitError::MalformedInput(format!(
            "expected {} public output cells, definition declared {}",
            NUM_INSTANCE_COLUMNS,
            values.len()
        )));
    }
    for (idx, value) in values.into_iter().enumerate() {
        builder.assigned_instances[idx].push(value);
    }
    Ok(())
}
