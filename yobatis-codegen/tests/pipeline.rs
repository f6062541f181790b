use std::fs;

use tempfile::TempDir;
use yobatis_codegen::{ContextOutcome, StaticTables, pipeline::Pipeline};
use yobatis_core::{FileTree, LocalTree, WriteResult};
use yobatis_ir::ConfigDocument;
use yobatis_project::{Error, FieldProblem, Settings};

fn write(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

const ROOT_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>org.demo</groupId>
  <artifactId>demo</artifactId>
  <packaging>pom</packaging>
  <properties>
    <db.name>demo</db.name>
    <mysql.version>5.1.44</mysql.version>
  </properties>
  <modules>
    <module>web</module>
  </modules>
</project>"#;

const WEB_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <artifactId>web</artifactId>
  <packaging>war</packaging>
  <dependencies>
    <dependency>
      <groupId>mysql</groupId>
      <artifactId>mysql-connector-java</artifactId>
      <version>${mysql.version}</version>
    </dependency>
  </dependencies>
</project>"#;

const WEB_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<web-app>
  <context-param>
    <param-name>contextConfigLocation</param-name>
    <param-value>classpath:spring/applicationContext.xml</param-value>
  </context-param>
</web-app>"#;

const APPLICATION_CONTEXT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<beans xmlns="http://www.springframework.org/schema/beans"
       xmlns:context="http://www.springframework.org/schema/context">
  <context:property-placeholder location="classpath:db.properties"/>
  <bean id="dataSource" class="com.alibaba.druid.pool.DruidDataSource">
    <property name="url" value="${jdbc.url}"/>
    <property name="username" value="${jdbc.username}"/>
    <property name="password" value="${jdbc.password}"/>
    <property name="driverClassName" value="com.mysql.jdbc.Driver"/>
  </bean>
</beans>"#;

const SETTINGS: &str = r#"
[project]
maven_repository = "/repo"

[[tables]]
name = "blog_post"

[[tables]]
name = "shop_order"
primary_keys = ["id"]
auto_increment = "id"

[[tables]]
name = "audit_log"
"#;

const OUTPUT: &str = "mybatisGeneratorConfig.xml";

fn maven_project(properties: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "pom.xml", ROOT_POM);
    write(&dir, "web/pom.xml", WEB_POM);
    write(&dir, "web/src/main/webapp/WEB-INF/web.xml", WEB_XML);
    write(
        &dir,
        "web/src/main/resources/spring/applicationContext.xml",
        APPLICATION_CONTEXT,
    );
    write(&dir, "web/src/main/resources/db.properties", properties);
    for package in ["blog/model", "blog/dao", "shop/model", "shop/dao"] {
        fs::create_dir_all(dir.path().join("web/src/main/java/org/demo").join(package)).unwrap();
    }
    dir
}

fn complete_project() -> TempDir {
    maven_project(
        "jdbc.url=jdbc:mysql://localhost:3306/${db.name}\njdbc.username=root\njdbc.password=secret\n",
    )
}

fn settings() -> Settings {
    Settings::from_str_with_filename(SETTINGS, "yobatis.toml").unwrap()
}

/// Run the pipeline and save the merged document, as `yobatis generate` does.
fn generate(dir: &TempDir) -> (ConfigDocument, Vec<ContextOutcome>, WriteResult) {
    generate_with(dir, settings())
}

fn generate_with(
    dir: &TempDir,
    settings: Settings,
) -> (ConfigDocument, Vec<ContextOutcome>, WriteResult) {
    let tree = LocalTree::open(dir.path()).unwrap();
    let pipeline = Pipeline::new(StaticTables::from(settings.tables.as_slice()));
    let ctx = pipeline.run(&tree, settings).unwrap();

    let merged = ctx.merged().unwrap();
    let result = tree.save(ctx.output_path(), &merged.document.render()).unwrap();
    let outcomes = merged.contexts.iter().map(|c| c.outcome).collect();
    (merged.document.clone(), outcomes, result)
}

fn live_tables<'d>(doc: &'d ConfigDocument, id: &str) -> Vec<&'d str> {
    doc.contexts()
        .find(|ctx| ctx.id() == Some(id))
        .map(|ctx| ctx.live_table_names().collect())
        .unwrap_or_default()
}

fn read_output(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join(OUTPUT)).unwrap()
}

/// Wrap a whole context of the written document in a comment, by hand.
fn comment_out_context(dir: &TempDir, id: &str) -> String {
    let mut text = read_output(dir);
    let start = text.find(&format!("<context id=\"{}\"", id)).unwrap();
    let end = start + text[start..].find("</context>").unwrap();
    text.replace_range(end..end + "</context>".len(), "</context-->");
    text.insert_str(start + 1, "!--");
    fs::write(dir.path().join(OUTPUT), &text).unwrap();
    text
}

fn commented_ids(doc: &ConfigDocument) -> Vec<&str> {
    doc.commented_contexts().filter_map(|ctx| ctx.id()).collect()
}

#[test]
fn test_generates_one_context_per_model_package() {
    let dir = complete_project();
    let (doc, outcomes, result) = generate(&dir);

    assert_eq!(result, WriteResult::Created);
    assert_eq!(outcomes, vec![ContextOutcome::New, ContextOutcome::New]);
    assert_eq!(
        doc.class_path_entry().and_then(|e| e.attribute("location")),
        Some("/repo/mysql/mysql-connector-java/5.1.44/mysql-connector-java-5.1.44.jar")
    );
    assert_eq!(
        live_tables(&doc, "org.demo.blog.model"),
        vec!["blog_post", "audit_log"]
    );
    assert_eq!(live_tables(&doc, "org.demo.shop.model"), vec!["shop_order"]);

    let text = read_output(&dir);
    assert!(text.contains(
        r#"<javaClientGenerator type="XMLMAPPER" targetPackage="org.demo.shop.dao" targetProject="web/src/main/java"/>"#
    ));
    assert!(text.contains(
        r#"<sqlMapGenerator targetPackage="mybatis-mappers" targetProject="web/src/main/resources"/>"#
    ));
    assert!(text.contains(r#"<generatedKey column="id" sqlStatement="mysql" identity="true"/>"#));
}

#[test]
fn test_reports_generator_dirs() {
    let dir = complete_project();
    let settings = settings();
    let tree = LocalTree::open(dir.path()).unwrap();
    let ctx = Pipeline::new(StaticTables::from(settings.tables.as_slice()))
        .run(&tree, settings)
        .unwrap();

    assert_eq!(ctx.generators.len(), 2);
    let blog = &ctx.generators[0];
    assert_eq!(blog.context, "org.demo.blog.model");
    assert_eq!(blog.model_dir, "web/src/main/java/org/demo/blog/model");
    assert_eq!(blog.criteria_dir, "web/src/main/java/org/demo/blog/model/criteria");
    assert_eq!(blog.dao_dir, "web/src/main/java/org/demo/blog/dao");
    assert_eq!(blog.xml_mapper_dir, "web/src/main/resources/mybatis-mappers");
}

#[test]
fn test_second_run_changes_nothing() {
    let dir = complete_project();
    generate(&dir);
    let first = read_output(&dir);

    let (_, outcomes, result) = generate(&dir);
    assert_eq!(result, WriteResult::Unchanged);
    assert_eq!(outcomes, vec![ContextOutcome::Merged, ContextOutcome::Merged]);
    assert_eq!(read_output(&dir), first);
}

#[test]
fn test_commented_table_stays_commented() {
    let dir = complete_project();
    generate(&dir);
    let live = r#"<table tableName="audit_log" schema="demo" modelType="flat"/>"#;
    let commented = r#"<!--table tableName="audit_log" schema="demo" modelType="flat"/-->"#;
    let edited = read_output(&dir).replace(live, commented);
    fs::write(dir.path().join(OUTPUT), &edited).unwrap();

    let (doc, _, result) = generate(&dir);
    assert_eq!(result, WriteResult::Unchanged);
    assert_eq!(live_tables(&doc, "org.demo.blog.model"), vec!["blog_post"]);
    assert!(read_output(&dir).contains(commented));
}

#[test]
fn test_commented_context_survives_reruns() {
    let dir = complete_project();
    generate(&dir);
    let edited = comment_out_context(&dir, "org.demo.shop.model");

    let (doc, outcomes, result) = generate(&dir);
    assert_eq!(result, WriteResult::Unchanged);
    assert_eq!(read_output(&dir), edited);
    assert_eq!(outcomes, vec![ContextOutcome::Merged]);
    assert_eq!(commented_ids(&doc), vec!["org.demo.shop.model"]);
    assert_eq!(doc.contexts().count(), 1);
    assert!(live_tables(&doc, "org.demo.shop.model").is_empty());

    // A table nothing tracks yet still gets generated.
    let more_tables = format!("{}\n[[tables]]\nname = \"shop_item\"\n", SETTINGS);
    let settings = || Settings::from_str_with_filename(&more_tables, "yobatis.toml").unwrap();
    let (doc, outcomes, result) = generate_with(&dir, settings());
    assert_eq!(result, WriteResult::Updated);
    assert_eq!(outcomes, vec![ContextOutcome::Merged, ContextOutcome::New]);
    assert_eq!(commented_ids(&doc), vec!["org.demo.shop.model"]);
    assert_eq!(live_tables(&doc, "org.demo.shop.model"), vec!["shop_item"]);
    let commented_tables: Vec<_> = doc
        .commented_contexts()
        .flat_map(|ctx| ctx.table_names())
        .collect();
    assert_eq!(commented_tables, vec!["shop_order"]);

    let written = read_output(&dir);
    let (doc, outcomes, result) = generate_with(&dir, settings());
    assert_eq!(result, WriteResult::Unchanged);
    assert_eq!(read_output(&dir), written);
    assert_eq!(outcomes, vec![ContextOutcome::Merged, ContextOutcome::Merged]);
    assert_eq!(doc.contexts().count(), 2);
    assert_eq!(commented_ids(&doc).len(), 1);
}

#[test]
fn test_table_moved_to_another_context_is_not_duplicated() {
    let dir = complete_project();
    generate(&dir);
    let table = r#"<table tableName="blog_post" schema="demo" modelType="flat"/>"#;
    let mut edited = read_output(&dir).replacen(table, "", 1);
    let last_context_end = edited.rfind("</context>").unwrap();
    edited.insert_str(last_context_end, table);
    fs::write(dir.path().join(OUTPUT), &edited).unwrap();

    let (doc, outcomes, _) = generate(&dir);
    assert_eq!(outcomes, vec![ContextOutcome::Merged, ContextOutcome::Merged]);
    assert_eq!(live_tables(&doc, "org.demo.blog.model"), vec!["audit_log"]);
    assert_eq!(
        live_tables(&doc, "org.demo.shop.model"),
        vec!["shop_order", "blog_post"]
    );
}

#[test]
fn test_unresolved_password_stops_the_run() {
    let dir = maven_project("jdbc.url=jdbc:mysql://localhost:3306/demo\njdbc.username=root\n");
    write(
        &dir,
        "web/src/main/resources/spring/applicationContext.xml",
        &APPLICATION_CONTEXT.replace("${jdbc.password}", "${unresolved}"),
    );
    let settings = settings();
    let tree = LocalTree::open(dir.path()).unwrap();

    let err = Pipeline::new(StaticTables::from(settings.tables.as_slice()))
        .run(&tree, settings)
        .unwrap_err();
    assert!(matches!(
        *err,
        Error::SqlConfigIncomplete {
            field: "password",
            problem: FieldProblem::Unresolved(_)
        }
    ));
    assert!(!dir.path().join(OUTPUT).exists());
}
