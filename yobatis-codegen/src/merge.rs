//! Folding a freshly rendered document into the one already on disk.
//!
//! The existing document is the user's: everything in it survives, in
//! place, including elements they commented out. The generated document
//! only contributes what the existing one lacks.
//!
//! Per context:
//!
//! - matched by id: every existing child is kept; generated plugins (by
//!   type), generators and connection settings (by element) are added only
//!   when no live or commented copy exists; generated tables are added only
//!   when no context of the existing document mentions them.
//! - only in the generated document: appended, minus tables the existing
//!   document already mentions.
//! - only in the existing document: commented out.
//! - generated with the id of a commented-out context: appended live only
//!   when it brings a table the existing document does not mention;
//!   otherwise the commented block stands alone.
//!
//! Any context left without a live table is commented out as a whole.

use std::collections::HashSet;

use tracing::debug;
use yobatis_core::Diagnostics;
use yobatis_ir::{Comment, ConfigDocument, ConfigItem, Context, ContextItem, Node, tags};

const PHASE: &str = "merge";

/// What happened to one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOutcome {
    /// Generated this run with no existing counterpart.
    New,
    /// Existing context reconciled with the generated one.
    Merged,
    /// Written as a commented block: not generated this run, or no live
    /// table remained.
    Commented,
}

impl std::fmt::Display for ContextOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextOutcome::New => write!(f, "new"),
            ContextOutcome::Merged => write!(f, "merged"),
            ContextOutcome::Commented => write!(f, "commented"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextReport {
    pub id: String,
    pub outcome: ContextOutcome,
    /// Tables that became live in this run.
    pub added_tables: Vec<String>,
    pub live_tables: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    pub document: ConfigDocument,
    pub contexts: Vec<ContextReport>,
}

/// Merge a generated document into an existing one, if any.
///
/// Without an existing document the generated one is taken as is.
pub fn merge(
    existing: Option<&ConfigDocument>,
    generated: &ConfigDocument,
    diagnostics: &mut Diagnostics,
) -> MergeOutput {
    match existing {
        Some(existing) => Merger::new(existing).merge(generated, diagnostics),
        None => MergeOutput {
            document: generated.clone(),
            contexts: generated
                .contexts()
                .map(|ctx| report(ctx, ContextOutcome::New, live_tables(ctx)))
                .collect(),
        },
    }
}

struct Merger<'e> {
    existing: &'e ConfigDocument,
    /// Every table any existing context mentions, live or commented.
    tracked: HashSet<&'e str>,
    /// Ids of commented-out contexts.
    disabled: HashSet<&'e str>,
}

impl<'e> Merger<'e> {
    fn new(existing: &'e ConfigDocument) -> Self {
        let tracked = existing
            .contexts()
            .chain(existing.commented_contexts())
            .flat_map(Context::table_names)
            .collect();
        let disabled = existing
            .commented_contexts()
            .filter_map(Context::id)
            .collect();
        Self {
            existing,
            tracked,
            disabled,
        }
    }

    fn merge(&self, generated: &ConfigDocument, diagnostics: &mut Diagnostics) -> MergeOutput {
        let mut pending: Vec<&Context> = generated.contexts().collect();
        let mut nodes = Vec::new();
        let mut reports = Vec::new();

        for node in self.existing.nodes() {
            let Node::Live(ConfigItem::Context(ctx)) = node else {
                nodes.push(node.clone());
                continue;
            };
            let counterpart = pending
                .iter()
                .position(|g| g.id() == ctx.id())
                .map(|index| pending.remove(index));
            let (merged, added, outcome) = match counterpart {
                Some(generated) => {
                    let (merged, added) = self.merge_context(ctx, generated);
                    (merged, added, ContextOutcome::Merged)
                }
                None => (ctx.clone(), Vec::new(), ContextOutcome::Commented),
            };
            let (node, report) = finish(merged, added, outcome);
            nodes.push(node);
            reports.push(report);
        }

        for generated in pending {
            let fresh = self.untracked(generated);
            let id = generated.id().unwrap_or_default();
            if self.disabled.contains(id) {
                if !fresh.has_live_table() {
                    diagnostics.info(PHASE, format!("context '{}' stays commented out", id));
                    continue;
                }
                diagnostics.warning(
                    PHASE,
                    format!(
                        "context '{}' is commented out, adding a live copy for its new tables",
                        id
                    ),
                );
            }
            let added = live_tables(&fresh);
            let (node, report) = finish(fresh, added, ContextOutcome::New);
            nodes.push(node);
            reports.push(report);
        }

        if self.existing.class_path_entry().is_none() {
            if let Some(entry) = generated.class_path_entry() {
                let at = nodes.iter().position(is_context).unwrap_or(nodes.len());
                nodes.insert(at, Node::Live(ConfigItem::ClassPathEntry(entry.clone())));
            }
        }

        MergeOutput {
            document: ConfigDocument::new(nodes),
            contexts: reports,
        }
    }

    /// Add to an existing context what it lacks from the generated one.
    fn merge_context(&self, existing: &Context, generated: &Context) -> (Context, Vec<String>) {
        let mut nodes = existing.nodes().to_vec();
        let mut added = Vec::new();
        for item in generated.live_items() {
            let present = match item.table_name() {
                Some(name) => self.tracked.contains(name),
                None => existing
                    .live_items()
                    .chain(existing.commented_items())
                    .any(|e| same_slot(e, item)),
            };
            if present {
                continue;
            }
            if let Some(name) = item.table_name() {
                added.push(name.to_string());
            }
            debug!(context = ?existing.id(), element = item.tag(), "adding generated element");
            insert_in_order(&mut nodes, item.clone());
        }
        (existing.with_nodes(nodes), added)
    }

    /// A generated context without the tables already tracked.
    fn untracked(&self, generated: &Context) -> Context {
        let nodes = generated
            .nodes()
            .iter()
            .filter(|node| {
                node.as_live()
                    .and_then(ContextItem::table_name)
                    .is_none_or(|name| !self.tracked.contains(name))
            })
            .cloned()
            .collect();
        generated.with_nodes(nodes)
    }
}

/// Plugins are told apart by type, everything else by element name.
fn same_slot(existing: &ContextItem, generated: &ContextItem) -> bool {
    match (existing, generated) {
        (ContextItem::Plugin(_), ContextItem::Plugin(_)) => {
            existing.plugin_type() == generated.plugin_type()
        }
        _ => existing.tag() == generated.tag(),
    }
}

fn finish(
    ctx: Context,
    added: Vec<String>,
    outcome: ContextOutcome,
) -> (Node<ConfigItem>, ContextReport) {
    let outcome = if ctx.has_live_table() {
        outcome
    } else {
        ContextOutcome::Commented
    };
    let report = report(&ctx, outcome, added);
    let node = match outcome {
        ContextOutcome::Commented => {
            Node::Commented(Comment::wrap(ConfigItem::Context(ctx.flattened()), 1))
        }
        _ => Node::Live(ConfigItem::Context(ctx)),
    };
    (node, report)
}

fn report(ctx: &Context, outcome: ContextOutcome, added_tables: Vec<String>) -> ContextReport {
    ContextReport {
        id: ctx.id().unwrap_or_default().to_string(),
        outcome,
        added_tables,
        live_tables: ctx.live_table_names().count(),
    }
}

fn live_tables(ctx: &Context) -> Vec<String> {
    ctx.live_table_names().map(str::to_string).collect()
}

fn is_context(node: &Node<ConfigItem>) -> bool {
    match node {
        Node::Live(item) => item.as_context().is_some(),
        Node::Commented(comment) => comment.items().iter().any(|i| i.as_context().is_some()),
    }
}

/// Position of an element among a context's children, in DTD order.
fn rank(tag: &str) -> usize {
    match tag {
        "property" => 0,
        tags::PLUGIN => 1,
        "commentGenerator" => 2,
        "connectionFactory" | tags::JDBC_CONNECTION => 3,
        tags::TYPE_RESOLVER => 4,
        tags::MODEL_GENERATOR => 5,
        tags::SQL_MAP_GENERATOR => 6,
        tags::CLIENT_GENERATOR => 7,
        tags::TABLE => 8,
        _ => 9,
    }
}

/// Insert after the last node that sorts at or before the item. Remarks
/// sort with the node before them.
fn insert_in_order(nodes: &mut Vec<Node<ContextItem>>, item: ContextItem) {
    let item_rank = rank(item.tag());
    let mut at = 0;
    let mut previous = 0;
    for (index, node) in nodes.iter().enumerate() {
        let node_rank = match node {
            Node::Live(live) => rank(live.tag()),
            Node::Commented(comment) => comment
                .items()
                .first()
                .map_or(previous, |first| rank(first.tag())),
        };
        if node_rank <= item_rank {
            at = index + 1;
        }
        previous = node_rank;
    }
    nodes.insert(at, Node::Live(item));
}

#[cfg(test)]
mod tests {
    use yobatis_ir::Element;

    use super::*;

    fn doc(body: &str) -> ConfigDocument {
        ConfigDocument::parse(&format!(
            "<generatorConfiguration>{}</generatorConfiguration>",
            body
        ))
        .unwrap()
    }

    fn names<'a>(ctx: &'a Context) -> Vec<&'a str> {
        ctx.live_table_names().collect()
    }

    #[test]
    fn test_without_existing_document_takes_generated() {
        let generated = doc(r#"<context id="a"><table tableName="t1"/></context>"#);
        let out = merge(None, &generated, &mut Diagnostics::new());
        assert_eq!(out.document, generated);
        assert_eq!(out.contexts[0].outcome, ContextOutcome::New);
        assert_eq!(out.contexts[0].added_tables, vec!["t1"]);
    }

    #[test]
    fn test_missing_generator_is_inserted_in_dtd_order() {
        let existing = doc(
            r#"<context id="a">
                 <javaModelGenerator targetPackage="a" targetProject="src"/>
                 <table tableName="t1"/>
               </context>"#,
        );
        let generated = doc(
            r#"<context id="a">
                 <javaModelGenerator targetPackage="x" targetProject="y"/>
                 <javaClientGenerator type="XMLMAPPER" targetPackage="a.dao" targetProject="src"/>
                 <table tableName="t1"/>
               </context>"#,
        );
        let out = merge(Some(&existing), &generated, &mut Diagnostics::new());
        let ctx = out.document.contexts().next().unwrap();
        let tags: Vec<_> = ctx.live_items().map(ContextItem::tag).collect();
        assert_eq!(
            tags,
            vec!["javaModelGenerator", "javaClientGenerator", "table"]
        );
        let model = ctx.live_items().next().unwrap().element();
        assert_eq!(model.attribute("targetPackage"), Some("a"), "existing element wins");
    }

    #[test]
    fn test_commented_plugin_is_not_revived() {
        let existing = doc(
            r#"<context id="a">
                 <!--plugin type="p.Dao"/-->
                 <table tableName="t1"/>
               </context>"#,
        );
        let generated = doc(
            r#"<context id="a">
                 <plugin type="p.Rename"/>
                 <plugin type="p.Dao"/>
                 <table tableName="t1"/>
               </context>"#,
        );
        let out = merge(Some(&existing), &generated, &mut Diagnostics::new());
        let ctx = out.document.contexts().next().unwrap();
        let live: Vec<_> = ctx.live_items().filter_map(ContextItem::plugin_type).collect();
        assert_eq!(live, vec!["p.Rename"]);
        let commented: Vec<_> = ctx
            .commented_items()
            .filter_map(ContextItem::plugin_type)
            .collect();
        assert_eq!(commented, vec!["p.Dao"]);
    }

    #[test]
    fn test_context_without_live_tables_is_commented() {
        let existing = doc(
            r#"<context id="a">
                 <!--table tableName="t1"/-->
               </context>"#,
        );
        let generated = doc(r#"<context id="a"><table tableName="t1"/></context>"#);
        let out = merge(Some(&existing), &generated, &mut Diagnostics::new());

        assert_eq!(out.document.contexts().count(), 0);
        let commented: Vec<_> = out.document.commented_contexts().collect();
        assert_eq!(commented.len(), 1);
        assert_eq!(names(commented[0]), vec!["t1"]);
        assert_eq!(out.contexts[0].outcome, ContextOutcome::Commented);
    }

    #[test]
    fn test_disabled_context_stays_disabled() {
        let existing = doc(
            r#"<!--context id="a" targetRuntime="MyBatis3">
                 <table tableName="t1"/>
               </context-->"#,
        );
        let generated = doc(r#"<context id="a"><table tableName="t1"/></context>"#);
        let mut diagnostics = Diagnostics::new();
        let out = merge(Some(&existing), &generated, &mut diagnostics);

        assert_eq!(out.document, existing);
        assert!(out.contexts.is_empty());
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn test_disabled_context_does_not_swallow_new_tables() {
        let existing = doc(
            r#"<!--context id="a" targetRuntime="MyBatis3">
                 <table tableName="t1"/>
               </context-->"#,
        );
        let generated = doc(
            r#"<context id="a"><table tableName="t1"/><table tableName="t2"/></context>"#,
        );
        let mut diagnostics = Diagnostics::new();
        let out = merge(Some(&existing), &generated, &mut diagnostics);

        let live: Vec<_> = out.document.contexts().collect();
        assert_eq!(live.len(), 1);
        assert_eq!(names(live[0]), vec!["t2"], "t1 is tracked by the commented block");
        assert_eq!(out.document.commented_contexts().count(), 1);
        assert_eq!(out.contexts[0].outcome, ContextOutcome::New);
        assert_eq!(out.contexts[0].added_tables, vec!["t2"]);
        assert_eq!(diagnostics.warning_count(), 1);

        let rerun = merge(Some(&out.document), &generated, &mut Diagnostics::new());
        assert_eq!(rerun.document, out.document);
    }

    #[test]
    fn test_commented_context_with_double_dash_reparses() {
        let existing = doc(
            r#"<context id="a">
                 <jdbcConnection driverClass="d" connectionURL="jdbc:mysql://db/demo" userId="u" password="p--w"/>
                 <!--table tableName="t1"/-->
               </context>"#,
        );
        let generated = doc(r#"<context id="a"><table tableName="t1"/></context>"#);
        let out = merge(Some(&existing), &generated, &mut Diagnostics::new());
        assert_eq!(out.contexts[0].outcome, ContextOutcome::Commented);

        let reparsed = ConfigDocument::parse(&out.document.render()).unwrap();
        let ctx = reparsed.commented_contexts().next().unwrap();
        let password = ctx
            .live_items()
            .find(|item| item.tag() == tags::JDBC_CONNECTION)
            .and_then(|item| item.element().attribute("password"));
        assert_eq!(password, Some("p--w"));
        assert_eq!(names(ctx), vec!["t1"]);

        let rerun = merge(Some(&reparsed), &generated, &mut Diagnostics::new());
        assert_eq!(rerun.document.render(), out.document.render());
    }

    #[test]
    fn test_class_path_entry_goes_before_contexts() {
        let existing = doc(
            r#"<properties resource="gen.properties"/>
               <context id="a"><table tableName="t1"/></context>"#,
        );
        let mut nodes = vec![Node::Live(ConfigItem::ClassPathEntry(
            Element::new(tags::CLASS_PATH_ENTRY).attr("location", "/new.jar"),
        ))];
        nodes.extend(doc(r#"<context id="a"><table tableName="t1"/></context>"#).nodes().iter().cloned());
        let generated = ConfigDocument::new(nodes);

        let out = merge(Some(&existing), &generated, &mut Diagnostics::new());
        let tags: Vec<_> = out
            .document
            .nodes()
            .iter()
            .filter_map(Node::as_live)
            .map(|item| match item {
                ConfigItem::ClassPathEntry(_) => "classPathEntry",
                ConfigItem::Context(_) => "context",
                ConfigItem::Other(e) => e.name(),
            })
            .collect();
        assert_eq!(tags, vec!["properties", "classPathEntry", "context"]);
    }

    #[test]
    fn test_insert_in_order_after_remark() {
        let mut nodes = vec![
            Node::Live(ContextItem::from(Element::new("plugin"))),
            Node::Commented(Comment::remark(" tables ")),
            Node::Live(ContextItem::from(Element::new("table"))),
        ];
        insert_in_order(&mut nodes, ContextItem::from(Element::new("jdbcConnection")));
        assert_eq!(
            nodes[2].as_live().map(ContextItem::tag),
            Some("jdbcConnection")
        );
    }
}
