//! Conversion functions for Python <-> BSON.

use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Decimal128, Document as BsonDocument};
use loadx_mongodb::coercion::integer;
use pyo3::conversion::IntoPyObject;
use pyo3::exceptions::{PyOverflowError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyDict, PyInt, PyList, PyTuple};
use std::str::FromStr;

use crate::error_handling::argument_error;

/// Convert a document argument (must be a dict)
pub(super) fn py_to_document(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<BsonDocument> {
    let dict = value
        .downcast::<PyDict>()
        .map_err(|_| argument_error("document", value))?;
    py_dict_to_bson(py, dict)
}

/// Convert a filter argument.
///
/// `None` is the empty filter. A dict of strings is an implicit equality
/// conjunction and any other dict is a query document; both convert the same
/// way.
pub(super) fn py_to_filter(
    py: Python<'_>,
    value: Option<&Bound<'_, PyAny>>,
) -> PyResult<BsonDocument> {
    let Some(value) = value else {
        return Ok(BsonDocument::new());
    };
    let dict = value
        .downcast::<PyDict>()
        .map_err(|_| argument_error("filter", value))?;
    py_dict_to_bson(py, dict)
}

/// Convert a list or tuple of dicts for bulk insert
pub(super) fn py_to_documents(
    py: Python<'_>,
    value: &Bound<'_, PyAny>,
) -> PyResult<Vec<BsonDocument>> {
    let items: Vec<Bound<'_, PyAny>> = if let Ok(list) = value.downcast::<PyList>() {
        list.iter().collect()
    } else if let Ok(tuple) = value.downcast::<PyTuple>() {
        tuple.iter().collect()
    } else {
        return Err(PyTypeError::new_err("documents must be a list of dicts"));
    };

    items
        .iter()
        .map(|item| {
            item.downcast::<PyDict>()
                .map_err(|_| PyTypeError::new_err("All items must be dicts"))
                .and_then(|dict| py_dict_to_bson(py, dict))
        })
        .collect()
}

fn dict_key(key: &Bound<'_, PyAny>) -> PyResult<String> {
    key.extract::<String>()
        .map_err(|_| PyTypeError::new_err("document keys must be strings"))
}

/// Convert Python dict to BSON document
pub(super) fn py_dict_to_bson(py: Python<'_>, dict: &Bound<'_, PyDict>) -> PyResult<BsonDocument> {
    let mut doc = BsonDocument::new();

    for (key, value) in dict.iter() {
        let bson_value = py_to_bson(py, &value)?;
        doc.insert(dict_key(&key)?, bson_value);
    }

    Ok(doc)
}

/// Convert Python value to BSON value
pub(super) fn py_to_bson(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<Bson> {
    if value.is_none() {
        return Ok(Bson::Null);
    }

    // Boolean (must check before int since bool is subclass of int in Python)
    if value.is_instance_of::<PyBool>() {
        return Ok(Bson::Boolean(value.extract::<bool>()?));
    }

    if let Ok(bytes) = value.downcast::<PyBytes>() {
        return Ok(Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.as_bytes().to_vec(),
        }));
    }

    // Check special types by name since PyDateTime is not available in abi3
    let type_name = value.get_type().name().map(|s| s.to_string()).unwrap_or_default();

    if type_name == "datetime" {
        return Ok(Bson::DateTime(bson::DateTime::from_millis(utc_millis(py, value)?)));
    }

    if type_name == "date" {
        // Midnight UTC of that day
        let datetime_mod = py.import("datetime")?;
        let midnight = datetime_mod
            .getattr("datetime")?
            .call_method1("combine", (value, datetime_mod.getattr("time")?.call0()?))?;
        return Ok(Bson::DateTime(bson::DateTime::from_millis(utc_millis(py, &midnight)?)));
    }

    if type_name == "Decimal" {
        let s = value.str()?.to_string();
        return Decimal128::from_str(&s)
            .map(Bson::Decimal128)
            .map_err(|e| PyValueError::new_err(format!("Invalid Decimal {}: {}", s, e)));
    }

    if value.is_instance_of::<PyInt>() {
        return value.extract::<i64>().map(integer).map_err(|_| {
            PyOverflowError::new_err(format!(
                "int {} does not fit in a 64-bit BSON integer",
                value
            ))
        });
    }

    if let Ok(f) = value.extract::<f64>() {
        return Ok(Bson::Double(f));
    }

    if let Ok(s) = value.extract::<String>() {
        return Ok(Bson::String(s));
    }

    if let Ok(dict) = value.downcast::<PyDict>() {
        return Ok(Bson::Document(py_dict_to_bson(py, dict)?));
    }

    if let Ok(list) = value.downcast::<PyList>() {
        let mut arr = Vec::with_capacity(list.len());
        for item in list.iter() {
            arr.push(py_to_bson(py, &item)?);
        }
        return Ok(Bson::Array(arr));
    }

    if let Ok(tuple) = value.downcast::<PyTuple>() {
        let mut arr = Vec::with_capacity(tuple.len());
        for item in tuple.iter() {
            arr.push(py_to_bson(py, &item)?);
        }
        return Ok(Bson::Array(arr));
    }

    // Fallback: string representation
    Ok(Bson::String(value.str()?.to_string()))
}

/// Milliseconds since the Unix epoch. Naive datetimes are taken as UTC.
fn utc_millis(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<i64> {
    let datetime_mod = py.import("datetime")?;
    let utc = datetime_mod.getattr("timezone")?.getattr("utc")?;
    let tz = PyDict::new(py);
    tz.set_item("tzinfo", &utc)?;

    let aware = if value.getattr("tzinfo")?.is_none() {
        value.call_method("replace", (), Some(&tz))?
    } else {
        value.clone()
    };
    let epoch = datetime_mod.getattr("datetime")?.call((1970, 1, 1), Some(&tz))?;
    let one_ms = datetime_mod.getattr("timedelta")?.call1((0, 0, 1000))?;

    aware.sub(&epoch)?.floor_div(&one_ms)?.extract::<i64>()
}

/// Convert BSON value to Python value
pub(super) fn bson_to_py(py: Python<'_>, bson: &Bson) -> PyResult<PyObject> {
    match bson {
        Bson::Null | Bson::Undefined => Ok(py.None()),
        Bson::Boolean(b) => Ok((*b).into_pyobject(py)?.to_owned().into_any().unbind()),
        Bson::Int32(i) => Ok((*i).into_pyobject(py)?.into_any().unbind()),
        Bson::Int64(i) => Ok((*i).into_pyobject(py)?.into_any().unbind()),
        Bson::Double(f) => Ok((*f).into_pyobject(py)?.into_any().unbind()),
        Bson::String(s) => Ok(s.as_str().into_pyobject(py)?.into_any().unbind()),
        Bson::ObjectId(oid) => Ok(oid.to_hex().into_pyobject(py)?.into_any().unbind()),
        Bson::Document(doc) => bson_doc_to_py_dict(py, doc),
        Bson::Array(arr) => {
            let list = PyList::empty(py);
            for item in arr {
                list.append(bson_to_py(py, item)?)?;
            }
            Ok(list.into())
        }
        Bson::DateTime(dt) => {
            let datetime_mod = py.import("datetime")?;
            let utc = datetime_mod.getattr("timezone")?.getattr("utc")?;
            let secs = dt.timestamp_millis() as f64 / 1000.0;
            let dt_obj = datetime_mod
                .getattr("datetime")?
                .call_method1("fromtimestamp", (secs, utc))?;
            Ok(dt_obj.into())
        }
        Bson::Binary(binary) => Ok(PyBytes::new(py, &binary.bytes).into()),
        Bson::Decimal128(dec) => {
            let decimal_cls = py.import("decimal")?.getattr("Decimal")?;
            Ok(decimal_cls.call1((dec.to_string(),))?.into())
        }
        Bson::RegularExpression(regex) => {
            let dict = PyDict::new(py);
            dict.set_item("$regex", &regex.pattern)?;
            dict.set_item("$options", &regex.options)?;
            Ok(dict.into())
        }
        Bson::Timestamp(ts) => {
            let dict = PyDict::new(py);
            dict.set_item("t", ts.time)?;
            dict.set_item("i", ts.increment)?;
            Ok(dict.into())
        }
        _ => Ok(bson.to_string().into_pyobject(py)?.into_any().unbind()),
    }
}

/// Convert BSON document to Python dict
pub(super) fn bson_doc_to_py_dict(py: Python<'_>, doc: &BsonDocument) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    for (key, value) in doc.iter() {
        dict.set_item(key, bson_to_py(py, value)?)?;
    }
    Ok(dict.into())
}

/// Convert result documents to a Python list of dicts
pub(super) fn bson_docs_to_py_list(py: Python<'_>, docs: &[BsonDocument]) -> PyResult<PyObject> {
    let list = PyList::empty(py);
    for doc in docs {
        list.append(bson_doc_to_py_dict(py, doc)?)?;
    }
    Ok(list.into())
}
