use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GraphyteError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GraphyteError::codec("x").to_string().contains("codec error:"));
    assert!(
        GraphyteError::scheduling("x")
            .to_string()
            .contains("scheduling error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GraphyteError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
