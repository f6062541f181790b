//! Spring bean definition files, read for datasource settings and for the
//! files they pull in.

use roxmltree::Node;

use crate::xml;

const P_NAMESPACE: &str = "http://www.springframework.org/schema/p";

/// Bean classes recognized as a JDBC datasource.
pub const DATASOURCE_CLASSES: [&str; 5] = [
    "com.alibaba.druid.pool.DruidDataSource",
    "org.apache.commons.dbcp.BasicDataSource",
    "org.apache.commons.dbcp2.BasicDataSource",
    "com.zaxxer.hikari.HikariDataSource",
    "org.springframework.jdbc.datasource.DriverManagerDataSource",
];

const PLACEHOLDER_CONFIGURERS: [&str; 2] = [
    "org.springframework.beans.factory.config.PropertyPlaceholderConfigurer",
    "org.springframework.context.support.PropertySourcesPlaceholderConfigurer",
];

/// Connection fields, as declared (placeholders unresolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasourceProperties {
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub driver_class_name: Option<String>,
}

impl DatasourceProperties {
    /// Fill fields still unset from another declaration.
    pub fn fill_from(&mut self, other: DatasourceProperties) {
        self.username = self.username.take().or(other.username);
        self.password = self.password.take().or(other.password);
        self.url = self.url.take().or(other.url);
        self.driver_class_name = self.driver_class_name.take().or(other.driver_class_name);
    }

    /// Apply a transformation to every present field.
    pub fn map(self, f: impl Fn(String) -> String) -> Self {
        Self {
            username: self.username.map(&f),
            password: self.password.map(&f),
            url: self.url.map(&f),
            driver_class_name: self.driver_class_name.map(&f),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.username.is_some()
            && self.password.is_some()
            && self.url.is_some()
            && self.driver_class_name.is_some()
    }
}

/// What one bean definition file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeanDefinitions {
    pub datasource: DatasourceProperties,
    /// Locations of properties files, in declaration order.
    pub property_locations: Vec<String>,
    /// `<import resource>` locations, in declaration order.
    pub imports: Vec<String>,
}

impl BeanDefinitions {
    /// Read a `beans` document.
    pub fn parse(text: &str) -> Result<Self, String> {
        let doc = xml::parse_rooted(text, "beans")?;
        let mut definitions = BeanDefinitions::default();

        for node in doc.descendants().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "import" => definitions.imports.extend(xml::attribute(node, "resource")),
                "property-placeholder" => {
                    if let Some(location) = xml::attribute(node, "location") {
                        definitions.property_locations.extend(split_list(&location));
                    }
                }
                "bean" => definitions.read_bean(node),
                _ => {}
            }
        }
        Ok(definitions)
    }

    fn read_bean(&mut self, bean: Node<'_, '_>) {
        let Some(class) = xml::attribute(bean, "class") else {
            return;
        };
        if DATASOURCE_CLASSES.contains(&class.as_str()) {
            let url_name = if class.ends_with("HikariDataSource") {
                "jdbcUrl"
            } else {
                "url"
            };
            self.datasource.fill_from(DatasourceProperties {
                username: bean_property(bean, "username"),
                password: bean_property(bean, "password"),
                url: bean_property(bean, url_name),
                driver_class_name: bean_property(bean, "driverClassName"),
            });
        } else if PLACEHOLDER_CONFIGURERS.contains(&class.as_str()) {
            if let Some(location) = bean_property(bean, "location") {
                self.property_locations.push(location);
            }
            self.property_locations.extend(bean_list_property(bean, "locations"));
        }
    }
}

/// A bean property from `p:name="..."` or `<property name="..." value="..."/>`.
fn bean_property(bean: Node<'_, '_>, name: &str) -> Option<String> {
    let from_attribute = bean
        .attributes()
        .find(|a| a.namespace() == Some(P_NAMESPACE) && a.name() == name)
        .map(|a| a.value().trim().to_string())
        .filter(|v| !v.is_empty());
    from_attribute.or_else(|| {
        let property = property_element(bean, name)?;
        xml::attribute(property, "value").or_else(|| xml::child_text(property, "value"))
    })
}

/// A list-valued bean property: a comma separated value, or a nested
/// `<list>`/`<set>` of `<value>` elements.
fn bean_list_property(bean: Node<'_, '_>, name: &str) -> Vec<String> {
    if let Some(value) = bean
        .attributes()
        .find(|a| a.namespace() == Some(P_NAMESPACE) && a.name() == name)
    {
        return split_list(value.value()).collect();
    }
    let Some(property) = property_element(bean, name) else {
        return Vec::new();
    };
    if let Some(value) = xml::attribute(property, "value") {
        return split_list(&value).collect();
    }
    property
        .children()
        .filter(|n| n.is_element() && matches!(n.tag_name().name(), "list" | "set"))
        .flat_map(|collection| xml::children(collection, "value"))
        .filter_map(xml::text)
        .collect()
}

fn property_element<'a, 'i>(bean: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    xml::children(bean, "property").find(|p| p.attribute("name").map(str::trim) == Some(name))
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
