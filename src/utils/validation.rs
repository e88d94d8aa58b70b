//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use serde::Serialize;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || lat < -90.0 || lat > 90.0 {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || lng < -180.0 || lng > 180.0 {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar un VIN de 17 caracteres con su dígito verificador (ISO 3779)
///
/// Los VIN más cortos (vehículos pre-1981) se aceptan sin verificación.
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    let vin = value.trim().to_ascii_uppercase();

    if vin.len() != 17 {
        if vin.is_empty() || vin.len() > 17 {
            let mut error = ValidationError::new("vin");
            error.add_param("value".into(), &value.to_string());
            error.add_param("length".into(), &vin.len());
            return Err(error);
        }
        return Ok(());
    }

    const WEIGHTS: [u32; 17] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

    let mut sum = 0u32;
    for (i, c) in vin.chars().enumerate() {
        let digit = match vin_char_value(c) {
            Some(v) => v,
            None => {
                let mut error = ValidationError::new("vin");
                error.add_param("value".into(), &value.to_string());
                error.add_param("invalid_char".into(), &c.to_string());
                return Err(error);
            }
        };
        sum += digit * WEIGHTS[i];
    }

    let remainder = sum % 11;
    let expected = if remainder == 10 { 'X' } else { char::from_digit(remainder, 10).unwrap_or('0') };
    let actual = vin.chars().nth(8).unwrap_or(' ');

    if actual != expected {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        error.add_param("check_digit".into(), &expected.to_string());
        return Err(error);
    }

    Ok(())
}

/// Transliteración de caracteres VIN; I, O y Q no son válidos
fn vin_char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A' => Some(1),
        'B' => Some(2),
        'C' => Some(3),
        'D' => Some(4),
        'E' => Some(5),
        'F' => Some(6),
        'G' => Some(7),
        'H' => Some(8),
        'J' => Some(1),
        'K' => Some(2),
        'L' => Some(3),
        'M' => Some(4),
        'N' => Some(5),
        'P' => Some(7),
        'R' => Some(9),
        'S' => Some(2),
        'T' => Some(3),
        'U' => Some(4),
        'V' => Some(5),
        'W' => Some(6),
        'X' => Some(7),
        'Y' => Some(8),
        'Z' => Some(9),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("hello").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(45.0, -75.0).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(5.0).is_ok());
        assert!(validate_non_negative(0.0).is_ok());
        assert!(validate_non_negative(-5.0).is_err());
    }

    #[test]
    fn test_validate_vin_check_digit() {
        // VIN conocido con dígito verificador correcto
        assert!(validate_vin("1M8GDM9AXKP042788").is_ok());
        // Mismo VIN con el dígito verificador alterado
        assert!(validate_vin("1M8GDM9A1KP042788").is_err());
        // Caracteres prohibidos
        assert!(validate_vin("1M8GDM9AXKP04278O").is_err());
        // VIN corto pre-1981: pasa sin verificación
        assert!(validate_vin("ABC12345").is_ok());
        // Demasiado largo
        assert!(validate_vin("1M8GDM9AXKP0427888").is_err());
    }
}
