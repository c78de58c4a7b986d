use chrono::Local;

/// Fecha actual para el formulario (AAAA-MM-DD)
pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Hora actual para el formulario (HH:MM)
pub fn now_time_string() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Marca de tiempo para nombres de archivo
pub fn file_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Marca de tiempo legible
pub fn display_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    #[test]
    fn test_form_defaults_parse_back() {
        assert!(NaiveDate::parse_from_str(&today_string(), "%Y-%m-%d").is_ok());
        assert!(NaiveTime::parse_from_str(&now_time_string(), "%H:%M").is_ok());
    }

    #[test]
    fn test_file_timestamp_shape() {
        let ts = file_timestamp();
        assert_eq!(ts.len(), 15);
        assert!(NaiveDateTime::parse_from_str(&ts, "%Y%m%d_%H%M%S").is_ok());
        assert!(!ts.contains(':'));
    }
}
