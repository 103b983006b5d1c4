use crate::error::ToolError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Mass,
    Temperature,
}

// (symbol, aliases, dimension, factor to the base unit: metre / gram)
const LINEAR_UNITS: &[(&str, &[&str], Dimension, f64)] = &[
    ("mm", &["millimeter", "millimetre", "millimeters", "millimetres"], Dimension::Length, 0.001),
    ("cm", &["centimeter", "centimetre", "centimeters", "centimetres"], Dimension::Length, 0.01),
    ("m", &["meter", "metre", "meters", "metres"], Dimension::Length, 1.0),
    ("km", &["kilometer", "kilometre", "kilometers", "kilometres"], Dimension::Length, 1000.0),
    ("in", &["inch", "inches"], Dimension::Length, 0.0254),
    ("ft", &["foot", "feet"], Dimension::Length, 0.3048),
    ("yd", &["yard", "yards"], Dimension::Length, 0.9144),
    ("mi", &["mile", "miles"], Dimension::Length, 1609.344),
    ("mg", &["milligram", "milligrams"], Dimension::Mass, 0.001),
    ("g", &["gram", "grams"], Dimension::Mass, 1.0),
    ("kg", &["kilogram", "kilograms"], Dimension::Mass, 1000.0),
    ("t", &["tonne", "tonnes", "ton", "tons"], Dimension::Mass, 1_000_000.0),
    ("oz", &["ounce", "ounces"], Dimension::Mass, 28.349_523_125),
    ("lb", &["pound", "pounds", "lbs"], Dimension::Mass, 453.592_37),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Linear(Dimension, f64),
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Unit {
    fn dimension(&self) -> Dimension {
        match self {
            Unit::Linear(dimension, _) => *dimension,
            _ => Dimension::Temperature,
        }
    }

    fn parse(input: &str) -> Result<Unit, ToolError> {
        let lowered = input.trim().to_lowercase();
        let name = lowered.as_str();
        match name {
            "c" | "celsius" | "°c" => return Ok(Unit::Celsius),
            "f" | "fahrenheit" | "°f" => return Ok(Unit::Fahrenheit),
            "k" | "kelvin" => return Ok(Unit::Kelvin),
            _ => {}
        }
        LINEAR_UNITS
            .iter()
            .find(|(symbol, aliases, _, _)| *symbol == name || aliases.contains(&name))
            .map(|(_, _, dimension, factor)| Unit::Linear(*dimension, *factor))
            .ok_or_else(|| ToolError::invalid("unit", format!("unknown unit '{}'", input.trim())))
    }
}

#[derive(Debug, Serialize)]
pub struct UnitConversion {
    pub value: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    pub dimension: Dimension,
}

fn to_kelvin(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => value + 273.15,
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + 273.15,
        _ => value,
    }
}

fn from_kelvin(kelvin: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => kelvin - 273.15,
        Unit::Fahrenheit => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
        _ => kelvin,
    }
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<UnitConversion, ToolError> {
    if !value.is_finite() {
        return Err(ToolError::invalid("value", "must be a finite number"));
    }

    let source = Unit::parse(from)?;
    let target = Unit::parse(to)?;
    if source.dimension() != target.dimension() {
        return Err(ToolError::invalid(
            "to",
            format!("cannot convert {:?} to {:?}", source.dimension(), target.dimension()),
        ));
    }

    let result = match (source, target) {
        (Unit::Linear(_, a), Unit::Linear(_, b)) => value * a / b,
        _ => {
            let kelvin = to_kelvin(value, source);
            if kelvin < 0.0 {
                return Err(ToolError::invalid("value", "below absolute zero"));
            }
            from_kelvin(kelvin, target)
        }
    };

    Ok(UnitConversion {
        value,
        from: from.trim().to_string(),
        to: to.trim().to_string(),
        // Trim float noise such as 0.30000000000000004
        result: (result * 1e9).round() / 1e9,
        dimension: source.dimension(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(value: f64, from: &str, to: &str) -> f64 {
        convert(value, from, to).unwrap().result
    }

    #[test]
    fn length_and_mass() {
        assert_eq!(result(1.0, "mi", "km"), 1.609344);
        assert_eq!(result(12.0, "inches", "ft"), 1.0);
        assert_eq!(result(1.0, "kg", "lb"), 2.204622622);
        assert_eq!(result(500.0, "g", "kilogram"), 0.5);
    }

    #[test]
    fn temperature() {
        assert_eq!(result(100.0, "C", "F"), 212.0);
        assert_eq!(result(32.0, "fahrenheit", "celsius"), 0.0);
        assert_eq!(result(0.0, "K", "C"), -273.15);
        assert!(convert(-300.0, "C", "K").is_err());
    }

    #[test]
    fn rejects_mismatched_or_unknown_units() {
        assert!(convert(1.0, "kg", "m").is_err());
        assert!(convert(1.0, "C", "m").is_err());
        assert!(convert(1.0, "parsec", "m").is_err());
        assert!(convert(f64::NAN, "m", "cm").is_err());
    }
}
