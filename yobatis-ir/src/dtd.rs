//! Document type of the generator configuration.

/// Root element name.
pub const ROOT_ELEMENT: &str = "generatorConfiguration";

/// Public identifier of the generator configuration DTD.
pub const PUBLIC_ID: &str = "-//mybatis.org//DTD MyBatis Generator Configuration 1.0//EN";

/// System identifier of the generator configuration DTD.
pub const SYSTEM_ID: &str = "http://mybatis.org/dtd/mybatis-generator-config_1_0.dtd";

/// Local copy of the DTD, so nothing is fetched over the network.
pub const DTD: &str = include_str!("../dtd/mybatis-generator-config_1_0.dtd");

/// The DOCTYPE declaration every written document carries.
pub fn doctype() -> String {
    format!(
        r#"<!DOCTYPE {} PUBLIC "{}" "{}">"#,
        ROOT_ELEMENT, PUBLIC_ID, SYSTEM_ID
    )
}

/// Resolve an external entity to the embedded DTD text.
///
/// Matches on the public identifier, or on the DTD file name at the end of
/// the system identifier (any scheme or host).
pub fn resolve_entity(public_id: Option<&str>, system_id: &str) -> Option<&'static str> {
    let file_name = SYSTEM_ID.rsplit('/').next().unwrap_or(SYSTEM_ID);
    if public_id == Some(PUBLIC_ID) || system_id.ends_with(file_name) {
        Some(DTD)
    } else {
        None
    }
}
