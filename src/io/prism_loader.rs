// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use crate::core::prism::Prism;
use crate::error::{EstimateError, Result};
use crate::math::constants::{Float, Vector3f};

/// Parsed input: the prisms plus the degree-of-accuracy value from the header.
#[derive(Debug, Clone, PartialEq)]
pub struct PrismInput {
    pub prisms: Vec<Prism>,
    pub deg_acc: Float,
}

pub fn load_prisms<P: AsRef<Path>>(path: P) -> Result<PrismInput> {
    let path = path.as_ref();
    log::info!("Reading prisms from: {}.", path.display());
    let data = fs::read_to_string(path)?;
    let input = parse_prisms(&data)?;
    log::info!("Prisms loaded, count = {}, deg_acc = {}.", input.prisms.len(), input.deg_acc);
    Ok(input)
}

/// Header `<N> <degAcc>` followed by `N` lines of `x1 y1 z1 x2 y2 z2`.
/// Lines after the `N`th record are ignored.
pub fn parse_prisms(source: &str) -> Result<PrismInput> {
    let mut lines = source.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| EstimateError::parse(1, "input is empty"))?;
    let header = parse_fields(header_line, header, 2)?;
    let count = prism_count(header[0])?;
    let deg_acc = header[1];

    // the header is not trusted until the records are there
    let mut prisms = Vec::with_capacity(count.min(source.lines().count()));
    for record in 0..count {
        let (line_no, line) = lines.next().ok_or_else(|| {
            EstimateError::parse(header_line + record + 1,
                                 format!("expected {} prism records, found {}", count, record))
        })?;
        let v = parse_fields(line_no, line, 6)?;
        prisms.push(Prism::from_corners(Vector3f::new(v[0], v[1], v[2]), Vector3f::new(v[3], v[4], v[5])));
    }

    Ok(PrismInput { prisms, deg_acc })
}

fn parse_fields(line_no: usize, line: &str, expected: usize) -> Result<Vec<Float>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(EstimateError::parse(line_no,
            format!("expected {} values, found {}", expected, fields.len())));
    }
    fields
        .iter()
        .map(|field| match field.parse::<Float>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(EstimateError::parse(line_no, format!("value {:?} is not finite", field))),
            Err(_) => Err(EstimateError::parse(line_no, format!("value {:?} is not a number", field))),
        })
        .collect()
}

fn prism_count(value: Float) -> Result<usize> {
    if value < 0.0 {
        return Err(EstimateError::Validation(format!("prism count {} is negative", value)));
    }
    if value.fract() != 0.0 {
        return Err(EstimateError::Validation(format!("prism count {} is not a whole number", value)));
    }
    if value > usize::MAX as Float {
        return Err(EstimateError::Validation(format!("prism count {} is too large", value)));
    }
    Ok(value as usize)
}
