//! Indicator trait and related types

use crate::error::IndicatorError;
use crate::widget::DisplayHandle;
use mm_types::Params;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait for all indicators
///
/// An indicator owns its sampling state and a display handle. The scheduler
/// calls `collect()` on every indicator before calling `update()` on any.
pub trait Indicator: Send {
    /// Sample the host and record the result in private state.
    ///
    /// The first call after construction only records a baseline for
    /// rate-based indicators.
    fn collect(&mut self) -> Result<(), IndicatorError>;

    /// Refresh the presentation from already-collected state. No sampling I/O.
    fn update(&mut self) -> Result<(), IndicatorError>;

    /// Handle the display shell renders; opaque to the scheduler
    fn display_handle(&self) -> DisplayHandle;
}

/// Type-erased indicator for dynamic dispatch
pub type BoxedIndicator = Box<dyn Indicator>;

/// An indicator implementation as the registry knows it.
///
/// Built-ins and plugin declarations both surface through this trait.
pub trait IndicatorType: Send + Sync {
    /// Dotted identifier used in `indicators_settings[].type`
    fn type_id(&self) -> &str;

    /// Best-guess constructor parameters, probed from the host
    fn infer_preferred_params(&self) -> Result<Params, IndicatorError>;

    /// Build an instance from fully merged parameters
    fn create(&self, params: &Params) -> Result<BoxedIndicator, IndicatorError>;
}

pub type IndicatorTypeRef = Arc<dyn IndicatorType>;

/// Statically known indicator implementation
pub trait BuiltinIndicator: Indicator + Sized + 'static {
    const TYPE_ID: &'static str;

    fn infer_preferred_params() -> Result<Params, IndicatorError>;

    fn from_params(params: &Params) -> Result<Self, IndicatorError>;
}

/// Adapter exposing a `BuiltinIndicator` as an `IndicatorType`
pub struct BuiltinType<T>(PhantomData<fn() -> T>);

impl<T> BuiltinType<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for BuiltinType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BuiltinIndicator> IndicatorType for BuiltinType<T> {
    fn type_id(&self) -> &str {
        T::TYPE_ID
    }

    fn infer_preferred_params(&self) -> Result<Params, IndicatorError> {
        T::infer_preferred_params()
    }

    fn create(&self, params: &Params) -> Result<BoxedIndicator, IndicatorError> {
        Ok(Box::new(T::from_params(params)?))
    }
}

/// Deserialize parameters into a typed config struct
pub fn params_into<T: DeserializeOwned>(params: &Params) -> Result<T, IndicatorError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| IndicatorError::InvalidParams(e.to_string()))
}

/// Instantiate an indicator from its configured kwargs.
///
/// Inferred parameters fill whatever the user did not set. When inference
/// fails and the user gave kwargs, construction is attempted with those alone.
pub fn instantiate(ty: &dyn IndicatorType, kwargs: &Params) -> Result<BoxedIndicator, IndicatorError> {
    let mut params = match ty.infer_preferred_params() {
        Ok(params) => params,
        Err(e) if !kwargs.is_empty() => {
            log::warn!(
                "Parameter inference for {} failed, using configured kwargs only: {}",
                ty.type_id(),
                e
            );
            Params::new()
        }
        Err(e) => return Err(e),
    };
    for (key, value) in kwargs {
        params.insert(key.clone(), value.clone());
    }
    log::debug!("Creating {} with {:?}", ty.type_id(), params);
    ty.create(&params)
}
