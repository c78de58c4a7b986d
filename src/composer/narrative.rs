//! Párrafo narrativo del acta
//!
//! Cada cláusula tiene varias redacciones equivalentes con los mismos campos. La
//! primera de cada lista es la redacción base.

use rand::Rng;

use crate::models::{Incident, SchoolConfig};

const OPENING: &[&str] = &[
    "Siendo las {hora} horas del día {fecha}",
    "El día {fecha}, a las {hora} horas",
    "Con fecha {fecha}, siendo las {hora} horas",
];

const CONTEXT: &[&str] = &[
    "durante {actividad} en {lugar}",
    "mientras se realizaba {actividad} en {lugar}",
    "en {lugar}, durante {actividad}",
];

const INCIDENT_TYPE: &[&str] = &[
    "se presentó una incidencia del tipo {tipo}.",
    "ocurrió una incidencia clasificada como {tipo}.",
    "se registró una incidencia de tipo {tipo}.",
];

const PARTICIPANTS: &[&str] = &[
    "En ella participaron {participantes} del grupo {grupo}.",
    "Los alumnos involucrados fueron {participantes} del grupo {grupo}.",
    "Participaron en los hechos {participantes}, del grupo {grupo}.",
];

const SEVERITY: &[&str] = &[
    "La gravedad fue evaluada como {gravedad}.",
    "La incidencia se consideró de gravedad {gravedad}.",
    "Se determinó que la gravedad es {gravedad}.",
];

const DESCRIPTION: &[&str] = &[
    "Los hechos se describen de la siguiente manera: {narracion}.",
    "Descripción de lo ocurrido: {narracion}.",
    "Lo sucedido se narra a continuación: {narracion}.",
];

const MEASURES: &[&str] = &[
    "Las medidas tomadas fueron: {medidas}.",
    "Como medidas se aplicaron: {medidas}.",
    "Se tomaron las siguientes medidas: {medidas}.",
];

const FOLLOW_UP: &[&str] = &[
    "Para su seguimiento se determinó: {seguimiento}.",
    "Como seguimiento se acordó: {seguimiento}.",
    "El seguimiento acordado es: {seguimiento}.",
];

/// Redacción elegida por el generador
pub fn compose<R: Rng>(incident: &Incident, config: &SchoolConfig, rng: &mut R) -> String {
    build(incident, config, |variants| variants[rng.random_range(0..variants.len())])
}

/// Redacción base, siempre igual
#[cfg(test)]
pub fn compose_plain(incident: &Incident, config: &SchoolConfig) -> String {
    build(incident, config, |variants| variants[0])
}

fn build(
    incident: &Incident,
    config: &SchoolConfig,
    mut pick: impl FnMut(&'static [&'static str]) -> &'static str,
) -> String {
    let fields = Fields::new(incident, config);

    let mut sentences = vec![
        format!(
            "{}, {}, {}",
            fields.fill(pick(OPENING)),
            fields.fill(pick(CONTEXT)),
            fields.fill(pick(INCIDENT_TYPE))
        ),
        fields.fill(pick(PARTICIPANTS)),
        fields.fill(pick(SEVERITY)),
        fields.fill(pick(DESCRIPTION)),
    ];

    if !incident.measures.trim().is_empty() {
        sentences.push(fields.fill(pick(MEASURES)));
    }
    if !incident.follow_up.trim().is_empty() {
        sentences.push(fields.fill(pick(FOLLOW_UP)));
    }

    sentences.join(" ")
}

struct Fields {
    pairs: Vec<(&'static str, String)>,
}

impl Fields {
    fn new(incident: &Incident, config: &SchoolConfig) -> Self {
        Self {
            pairs: vec![
                ("{fecha}", incident.date.trim().to_string()),
                ("{hora}", incident.time.trim().to_string()),
                ("{actividad}", incident.activity.trim().to_string()),
                ("{lugar}", incident.location.trim().to_string()),
                ("{tipo}", incident.incident_type.trim().to_string()),
                ("{participantes}", incident.participants_joined()),
                ("{grupo}", config.class_label()),
                ("{gravedad}", incident.severity.label().to_lowercase()),
                ("{narracion}", sentence_body(&incident.narrative)),
                ("{medidas}", sentence_body(&incident.measures)),
                ("{seguimiento}", sentence_body(&incident.follow_up)),
            ],
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Una sola pasada sobre la plantilla; el texto insertado no se vuelve a revisar
    fn fill(&self, template: &str) -> String {
        let mut text = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            text.push_str(&rest[..start]);
            let tail = &rest[start..];
            let field = tail
                .find('}')
                .map(|end| &tail[..=end])
                .and_then(|key| self.value(key).map(|value| (key.len(), value)));

            match field {
                Some((len, value)) => {
                    text.push_str(value);
                    rest = &tail[len..];
                }
                None => {
                    text.push('{');
                    rest = &tail[1..];
                }
            }
        }

        text.push_str(rest);
        text
    }
}

// Evita ".." cuando el texto libre ya termina en punto
fn sentence_body(text: &str) -> String {
    text.trim().trim_end_matches('.').trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn incident() -> Incident {
        Incident {
            date: "2024-05-02".into(),
            time: "10:15".into(),
            location: "Patio".into(),
            activity: "el recreo".into(),
            incident_type: "Pelea".into(),
            severity: Severity::Grave,
            participants: vec!["Ana".into(), "Luis".into()],
            narrative: "Se empujaron en la fila.".into(),
            measures: String::new(),
            follow_up: String::new(),
        }
    }

    fn config() -> SchoolConfig {
        SchoolConfig {
            grade: "2°".into(),
            group: "A".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_narrative() {
        let text = compose_plain(&incident(), &config());
        assert_eq!(
            text,
            "Siendo las 10:15 horas del día 2024-05-02, durante el recreo en Patio, \
             se presentó una incidencia del tipo Pelea. \
             En ella participaron Ana, Luis del grupo 2° A. \
             La gravedad fue evaluada como grave. \
             Los hechos se describen de la siguiente manera: Se empujaron en la fila."
        );
    }

    #[test]
    fn test_optional_sentences() {
        let mut inc = incident();
        inc.measures = "Plática con ambos".into();
        inc.follow_up = "Citar a los padres".into();
        let text = compose_plain(&inc, &config());
        assert!(text.ends_with(
            "Las medidas tomadas fueron: Plática con ambos. \
             Para su seguimiento se determinó: Citar a los padres."
        ));

        inc.measures = "   ".into();
        let text = compose_plain(&inc, &config());
        assert!(!text.contains("medidas"));
    }

    #[test]
    fn test_braces_in_user_text_are_kept_literally() {
        let mut inc = incident();
        inc.activity = "el juego {lugar}".into();
        inc.narrative = "Escribió {tipo} en el pizarrón".into();
        let text = compose_plain(&inc, &config());
        assert!(text.contains("durante el juego {lugar} en Patio"));
        assert!(text.contains("Escribió {tipo} en el pizarrón"));
    }

    #[test]
    fn test_random_variants_keep_every_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut inc = incident();
        inc.measures = "Reporte".into();
        inc.follow_up = "Revisión semanal".into();

        for _ in 0..50 {
            let text = compose(&inc, &config(), &mut rng);
            for expected in [
                "2024-05-02",
                "10:15",
                "el recreo",
                "Patio",
                "Pelea",
                "Ana, Luis",
                "2° A",
                "grave",
                "Se empujaron en la fila",
                "Reporte",
                "Revisión semanal",
            ] {
                assert!(text.contains(expected), "falta '{}' en: {}", expected, text);
            }
            assert!(!text.contains('{'));
        }
    }

    #[test]
    fn test_all_variants_share_placeholders() {
        for group in [OPENING, CONTEXT, INCIDENT_TYPE, PARTICIPANTS, SEVERITY, DESCRIPTION, MEASURES, FOLLOW_UP] {
            let mut keys: Vec<Vec<&str>> = group
                .iter()
                .map(|v| {
                    let mut k: Vec<&str> = v.split('{').skip(1).map(|s| s.split('}').next().unwrap_or("")).collect();
                    k.sort();
                    k
                })
                .collect();
            keys.dedup();
            assert_eq!(keys.len(), 1);
        }
    }
}
