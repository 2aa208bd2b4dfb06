//! Construction of bodies from configuration sections.

use nanocut_geometry::{ConfigError, Geometry, Periodicity, Sections};

use crate::body::{BodyKind, BodySpec};

/// Build every body declared in `sections`, in document order.
///
/// Body sections are named `<bodytype>:<label>`; sections whose names do not
/// split into exactly two tokens at `:` are not bodies and are skipped. The
/// body type must be allowed under the active periodicity. The optional
/// `additive` key (default `true`) is consumed here; the remaining keys go to
/// the body constructor.
pub fn resolve_bodies(
    sections: &Sections,
    geometry: &Geometry,
    periodicity: &Periodicity,
) -> Result<Vec<BodySpec>, ConfigError> {
    let mut specs = Vec::new();

    for (name, section) in sections.iter() {
        let tokens: Vec<&str> = name.split(':').collect();
        let [body_type, _label] = tokens[..] else {
            continue;
        };

        let kind = BodyKind::lookup(body_type, periodicity.period_type()).ok_or_else(|| {
            ConfigError::UnknownBodyType {
                section: name.to_string(),
                body_type: body_type.to_string(),
                period_type: periodicity.period_type().to_string(),
            }
        })?;

        let mut keys = section.clone();
        let additive = match keys.remove("additive") {
            None => true,
            Some(toml::Value::Boolean(flag)) => flag,
            Some(other) => {
                return Err(ConfigError::invalid(
                    name,
                    format!("'additive' must be a boolean, found {}", other.type_str()),
                ))
            }
        };

        let body = kind.build(geometry, periodicity, name, &keys)?;
        log::debug!(
            "Body [{}]: {} ({}), bounds {:?}..{:?}",
            name,
            kind.name(),
            if additive { "additive" } else { "subtractive" },
            body.containing_cuboid().min.as_slice(),
            body.containing_cuboid().max.as_slice()
        );
        specs.push(BodySpec { body, additive });
    }

    if specs.is_empty() {
        return Err(ConfigError::NoBodies);
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanocut_geometry::{CoordSys, PeriodType};

    fn cubic() -> Geometry {
        Geometry::new(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &[("Si", [0.0; 3])],
            CoordSys::Lattice,
            1.0,
        )
        .unwrap()
    }

    fn sections(doc: &str) -> Sections {
        Sections::from_toml_str(doc).unwrap()
    }

    #[test]
    fn test_bodies_in_document_order() {
        let doc = r#"
            [geometry]
            lengthunit = 1.0

            ["cylinder:rod"]
            point1 = [0, 0, 0]
            point2 = [0, 0, 3]
            radius = 1.0

            ["sphere:hole"]
            radius = 0.5
            additive = false
        "#;
        let specs = resolve_bodies(&sections(doc), &cubic(), &Periodicity::cluster()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].body.kind(), BodyKind::Cylinder);
        assert!(specs[0].additive);
        assert_eq!(specs[1].body.kind(), BodyKind::Sphere);
        assert!(!specs[1].additive);
    }

    #[test]
    fn test_other_token_counts_are_ignored() {
        let doc = r#"
            ["sphere"]
            radius = 1.0

            ["sphere:a:b"]
            radius = 1.0

            ["sphere:kept"]
            radius = 1.0
        "#;
        let specs = resolve_bodies(&sections(doc), &cubic(), &Periodicity::cluster()).unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_incompatible_body_type() {
        let g = cubic();
        let wire = Periodicity::new(&g, PeriodType::Wire, &[[0, 0, 1]]).unwrap();
        let err = resolve_bodies(&sections("[\"sphere:a\"]\nradius = 1.0"), &g, &wire).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBodyType { .. }));
        assert!(err.to_string().contains("1D"));

        let err = resolve_bodies(&sections("[\"cube:a\"]\nedge = 1.0"), &g, &Periodicity::cluster())
            .unwrap_err();
        assert!(err.to_string().contains("unknown or incompatible body type"));
    }

    #[test]
    fn test_no_bodies() {
        let err = resolve_bodies(&sections("[geometry]\nlengthunit = 1.0"), &cubic(), &Periodicity::cluster())
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoBodies));
    }

    #[test]
    fn test_additive_must_be_boolean() {
        let doc = "[\"sphere:a\"]\nradius = 1.0\nadditive = \"no\"";
        let err = resolve_bodies(&sections(doc), &cubic(), &Periodicity::cluster()).unwrap_err();
        assert!(err.to_string().contains("additive"));
    }
}
