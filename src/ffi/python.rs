// In: src/ffi/python.rs

use chrono::NaiveDate;
use log::LevelFilter;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyDate, PyDateAccess, PyDict};

use crate::bridge::ShapefileWriter;
use crate::config::{EncoderConfig, MixedKindPolicy};
use crate::model::{AttributeValue, Attributes, Coord, Feature, Geometry};
use crate::observability;
use crate::types::ShapeType;

//==================================================================================
// I. Conversions
//==================================================================================

fn value_error(msg: impl Into<String>) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(msg.into())
}

/// Converts one Python value. `bool` is checked before the numeric types since
/// it is a subclass of `int`.
fn to_attribute_value(value: &Bound<'_, PyAny>) -> PyResult<Option<AttributeValue>> {
    if value.is_none() {
        return Ok(Some(AttributeValue::Null));
    }
    if let Ok(b) = value.downcast::<PyBool>() {
        return Ok(Some(AttributeValue::Boolean(b.is_true())));
    }
    if let Ok(date) = value.downcast::<PyDate>() {
        let parsed = NaiveDate::from_ymd_opt(
            date.get_year(),
            date.get_month() as u32,
            date.get_day() as u32,
        );
        return Ok(parsed.map(AttributeValue::Date));
    }
    if let Ok(n) = value.extract::<f64>() {
        return Ok(Some(AttributeValue::Number(n)));
    }
    if let Ok(s) = value.extract::<String>() {
        return Ok(Some(AttributeValue::Text(s)));
    }
    Ok(None)
}

fn to_attributes(dict: Option<&Bound<'_, PyDict>>) -> PyResult<Attributes> {
    let mut attrs = Attributes::new();
    let Some(dict) = dict else {
        return Ok(attrs);
    };
    for (key, value) in dict.iter() {
        let key: String = key.str()?.extract()?;
        match to_attribute_value(&value)? {
            Some(v) => attrs.insert(key, v),
            None => log::debug!("Dropping attribute '{}' of unsupported Python type", key),
        }
    }
    Ok(attrs)
}

//==================================================================================
// II. Stateful Writer API
//==================================================================================

#[pyclass(name = "ShapefileWriter", module = "shpforge")]
pub struct PyShapefileWriter {
    inner: ShapefileWriter,
}

#[pymethods]
impl PyShapefileWriter {
    /// Creates a new writer.
    ///
    /// `table_date` is an ISO date (`YYYY-MM-DD`) stamped into every `.dbf`
    /// header; when omitted the current local date is used.
    #[new]
    #[pyo3(signature = (
        table_date = None,
        mixed_kinds = "coerce_to_character",
        auto_id_field = "ID_AUTO"
    ))]
    fn new(table_date: Option<&str>, mixed_kinds: &str, auto_id_field: &str) -> PyResult<Self> {
        let parsed_policy = match mixed_kinds.to_lowercase().as_str() {
            "coerce_to_character" => MixedKindPolicy::CoerceToCharacter,
            "first_seen" => MixedKindPolicy::FirstSeen,
            _ => {
                return Err(value_error(
                    "Invalid mixed_kinds. Must be 'coerce_to_character' or 'first_seen'.",
                ))
            }
        };

        let parsed_date = table_date
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| value_error(format!("Invalid table_date: {}", e)))?;

        let config = EncoderConfig {
            mixed_kinds: parsed_policy,
            table_date: parsed_date,
            auto_id_field: auto_id_field.to_string(),
        };
        Ok(Self {
            inner: ShapefileWriter::new(config),
        })
    }

    #[pyo3(signature = (x, y, attributes = None))]
    fn add_point(
        &mut self,
        x: f64,
        y: f64,
        attributes: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<()> {
        let feature = Feature::with_attributes(Geometry::Point { x, y }, to_attributes(attributes)?);
        Ok(self.inner.add_feature(feature)?)
    }

    /// `paths` is a list of parts, each a list of `(x, y)` tuples.
    #[pyo3(signature = (paths, attributes = None))]
    fn add_polyline(
        &mut self,
        paths: Vec<Vec<Coord>>,
        attributes: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<()> {
        let feature =
            Feature::with_attributes(Geometry::Polyline { paths }, to_attributes(attributes)?);
        Ok(self.inner.add_feature(feature)?)
    }

    /// `rings` is a list of rings, each a list of `(x, y)` tuples.
    #[pyo3(signature = (rings, attributes = None))]
    fn add_polygon(
        &mut self,
        rings: Vec<Vec<Coord>>,
        attributes: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<()> {
        let feature =
            Feature::with_attributes(Geometry::Polygon { rings }, to_attributes(attributes)?);
        Ok(self.inner.add_feature(feature)?)
    }

    /// Adds ESRI JSON graphics. Returns how many had a usable geometry.
    fn add_esri_json(&mut self, json: &str) -> PyResult<usize> {
        Ok(self.inner.add_esri_json(json)?)
    }

    /// Adds GeoJSON features. Returns how many had a usable geometry.
    fn add_geojson(&mut self, json: &str) -> PyResult<usize> {
        Ok(self.inner.add_geojson(json)?)
    }

    /// Encodes one kind and returns `{"shp": bytes, "shx": bytes, "dbf": bytes}`,
    /// or `None` if no features of that kind were added.
    fn export<'py>(
        &mut self,
        py: Python<'py>,
        kind: &str,
    ) -> PyResult<Option<Bound<'py, PyDict>>> {
        let kind: ShapeType = kind.parse()?;
        let Some(bundle) = self.inner.export(kind)? else {
            return Ok(None);
        };

        let result_dict = PyDict::new_bound(py);
        for (role, bytes) in bundle.iter() {
            result_dict.set_item(role.extension(), PyBytes::new_bound(py, bytes))?;
        }
        Ok(Some(result_dict))
    }

    fn clear(&mut self) {
        self.inner.clear_all();
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

//==================================================================================
// III. Module Functions
//==================================================================================

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    observability::init_logging(LevelFilter::Info, log_file.as_deref())?;
    Ok(())
}
