//! Resolve a land-cover classification into a parameter field
//!
//! A classification already on the target grid is looked up cell by cell.
//! Otherwise the classes are first brought onto an intermediate grid over
//! the target extent by area majority, looked up there, and the resulting
//! continuous values are averaged onto the target grid. The classification
//! may be in a different CRS when the pair is WGS84 / UTM.

use crate::parameters::{ParameterTable, Variable};
use pmjpl_core::{
    resample_categorical, resample_continuous, Error, Field, Raster, RasterElement,
    RasterGeometry, Result,
};
use std::sync::Arc;
use tracing::debug;

/// Handling of classification cells that carry no class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoDataPolicy {
    /// Use the fallback (unclassified) row
    #[default]
    Fallback,
    /// Emit NaN
    Propagate,
}

/// Parameters for [`ParameterResolver::resolve`]
#[derive(Debug, Clone, Default)]
pub struct ResolveParams {
    /// Grid the output must be on. `None` keeps the classification's grid.
    pub target_geometry: Option<RasterGeometry>,
    /// Cell size of the intermediate class grid used when the
    /// classification does not match the target. Defaults to the
    /// classification's own cell size, expressed in the target's CRS.
    pub classification_upsampling_resolution: Option<f64>,
    pub nodata_policy: NoDataPolicy,
}

impl ResolveParams {
    /// Output on `geometry`, other settings default
    pub fn on(geometry: RasterGeometry) -> Self {
        Self {
            target_geometry: Some(geometry),
            ..Default::default()
        }
    }

    pub fn with_upsampling_resolution(mut self, resolution: f64) -> Self {
        self.classification_upsampling_resolution = Some(resolution);
        self
    }

    pub fn with_nodata_policy(mut self, policy: NoDataPolicy) -> Self {
        self.nodata_policy = policy;
        self
    }
}

/// Turns classifications into per-variable parameter fields.
///
/// Cloning is cheap; the table is shared.
#[derive(Debug, Clone)]
pub struct ParameterResolver {
    table: Arc<ParameterTable>,
}

impl ParameterResolver {
    pub fn new(table: Arc<ParameterTable>) -> Self {
        Self { table }
    }

    /// Resolver over the IGBP biome property table
    pub fn igbp() -> Self {
        Self::new(Arc::new(ParameterTable::igbp()))
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    /// Resolve `variable` for every element of `classification`.
    ///
    /// The output has the variant of the input, except that a scalar or
    /// plain array resolved with a target geometry becomes a raster on that
    /// geometry. With a target geometry the output always has exactly the
    /// target's shape, transform and CRS.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] for a non-positive upsampling resolution
    /// - [`Error::GeometryMismatch`] for an empty target, an upsampling
    ///   resolution without a target, or a plain array whose shape is not
    ///   the target's
    /// - [`Error::CrsMismatch`] when a raster must be resampled across CRSs
    ///   that have no supported transform
    /// - [`Error::InvalidClassification`] for fractional or infinite codes
    pub fn resolve<T: RasterElement>(
        &self,
        variable: Variable,
        classification: &Field<T>,
        params: &ResolveParams,
    ) -> Result<Field<f64>> {
        let policy = params.nodata_policy;

        if let Some(resolution) = params.classification_upsampling_resolution {
            if !(resolution.is_finite() && resolution > 0.0) {
                return Err(Error::InvalidParameter {
                    name: "classification_upsampling_resolution",
                    value: resolution.to_string(),
                    reason: "must be a positive finite distance".into(),
                });
            }
        }

        let Some(target) = &params.target_geometry else {
            if params.classification_upsampling_resolution.is_some() {
                return Err(Error::GeometryMismatch(
                    "an upsampling resolution needs a target geometry".into(),
                ));
            }
            debug!("resolving {} on the classification grid", variable);
            return self.lookup(variable, classification, policy);
        };

        if target.is_empty() {
            return Err(Error::GeometryMismatch(format!(
                "target geometry is empty ({}x{})",
                target.rows, target.cols
            )));
        }

        let mut output = match classification {
            Field::Raster(raster) if !raster.geometry().matches(target) => self.resample(
                variable,
                raster,
                target,
                params.classification_upsampling_resolution,
                policy,
            )?,
            _ => self.lookup(variable, classification, policy)?.on_geometry(target)?,
        };

        // Approximate matches are snapped onto the exact target
        output.set_transform(target.transform);
        output.set_crs(target.crs.clone());
        output.set_nodata(Some(f64::NAN));
        Ok(Field::Raster(output))
    }

    /// Like [`ParameterResolver::resolve`] with the variable given by name
    pub fn resolve_by_name<T: RasterElement>(
        &self,
        name: &str,
        classification: &Field<T>,
        params: &ResolveParams,
    ) -> Result<Field<f64>> {
        self.resolve(name.parse()?, classification, params)
    }

    fn lookup<T: RasterElement>(
        &self,
        variable: Variable,
        classification: &Field<T>,
        policy: NoDataPolicy,
    ) -> Result<Field<f64>> {
        classification.try_map(|code| self.lookup_cell(variable, code, policy))
    }

    fn lookup_cell<T: RasterElement>(
        &self,
        variable: Variable,
        code: Option<T>,
        policy: NoDataPolicy,
    ) -> Result<f64> {
        match code.filter(|c| !c.is_nodata(None)) {
            None => Ok(match policy {
                NoDataPolicy::Fallback => self.table.fallback().get(variable),
                NoDataPolicy::Propagate => f64::NAN,
            }),
            Some(c) => c
                .to_class_code()
                .map(|code| self.table.lookup(code, variable))
                .ok_or_else(|| {
                    Error::InvalidClassification(format!("{} is not an integer class code", c))
                }),
        }
    }

    fn resample<T: RasterElement>(
        &self,
        variable: Variable,
        classification: &Raster<T>,
        target: &RasterGeometry,
        resolution: Option<f64>,
        policy: NoDataPolicy,
    ) -> Result<Raster<f64>> {
        let resolution = resolution
            .or_else(|| classification.geometry().cell_size_in(target.crs.as_ref()))
            .unwrap_or_else(|| target.cell_size());
        let intermediate = target.with_cell_size(resolution)?;
        debug!(
            "resolving {}: classification {}x{} @ {} -> classes {}x{} @ {} -> target {}x{} @ {}",
            variable,
            classification.rows(),
            classification.cols(),
            classification.cell_size(),
            intermediate.rows,
            intermediate.cols,
            resolution,
            target.rows,
            target.cols,
            target.cell_size()
        );

        let classes = resample_categorical(classification, &intermediate)?;
        let values = classes.try_map(|code| self.lookup_cell(variable, code, policy))?;
        resample_continuous(&values, target)
    }
}

impl Default for ParameterResolver {
    fn default() -> Self {
        Self::igbp()
    }
}
