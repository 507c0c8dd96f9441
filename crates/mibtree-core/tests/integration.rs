//! End-to-end tests over complete module texts.

use mibtree_core::error::Error;
use mibtree_core::module::Syntax;
use mibtree_core::resolver::{MissingImport, Resolver};

/// Condensed SNMPv2-SMI: the OID skeleton, MACRO definitions that must be
/// skipped, and the zeroDotZero stub with its unresolvable parent.
const BASE: &str = r#"
SNMPv2-SMI DEFINITIONS ::= BEGIN

-- the path to the root

org            OBJECT IDENTIFIER ::= { iso 3 }
dod            OBJECT IDENTIFIER ::= { org 6 }
internet       OBJECT IDENTIFIER ::= { dod 1 }

directory      OBJECT IDENTIFIER ::= { internet 1 }
mgmt           OBJECT IDENTIFIER ::= { internet 2 }
mib-2          OBJECT IDENTIFIER ::= { mgmt 1 }
transmission   OBJECT IDENTIFIER ::= { mib-2 10 }
experimental   OBJECT IDENTIFIER ::= { internet 3 }
private        OBJECT IDENTIFIER ::= { internet 4 }
enterprises    OBJECT IDENTIFIER ::= { private 1 }
security       OBJECT IDENTIFIER ::= { internet 5 }
snmpV2         OBJECT IDENTIFIER ::= { internet 6 }

snmpDomains    OBJECT IDENTIFIER ::= { snmpV2 1 }
snmpProxys     OBJECT IDENTIFIER ::= { snmpV2 2 }
snmpModules    OBJECT IDENTIFIER ::= { snmpV2 3 }

MODULE-IDENTITY MACRO ::=
BEGIN
    TYPE NOTATION ::=
                  "LAST-UPDATED" value(Update ExtUTCTime)
                  "ORGANIZATION" Text
                  "CONTACT-INFO" Text
                  "DESCRIPTION" Text
                  RevisionPart
    VALUE NOTATION ::=
                  value(VALUE OBJECT IDENTIFIER)
END

OBJECT-TYPE MACRO ::=
BEGIN
    TYPE NOTATION ::=
                  "SYNTAX" Syntax
                  UnitsPart
                  "MAX-ACCESS" Access
                  "STATUS" Status
    VALUE NOTATION ::=
                  value(VALUE ObjectName)
END

zeroDotZero OBJECT-IDENTITY
    STATUS current
    DESCRIPTION "A value used for null identifiers."
    ::= { 0 0 }

END
"#;

/// SMIv2 vendor module with an identity anchor, a scalar, a table and a
/// notification.
const WIDGET: &str = r#"
ACME-WIDGET-MIB DEFINITIONS ::= BEGIN

IMPORTS
    MODULE-IDENTITY, OBJECT-TYPE, NOTIFICATION-TYPE,
    Integer32, Counter32, enterprises
        FROM SNMPv2-SMI
    DisplayString
        FROM SNMPv2-TC;

acmeWidgetMIB MODULE-IDENTITY
    LAST-UPDATED "202408260000Z"
    ORGANIZATION "Acme Corp."
    CONTACT-INFO "support@acme.example"
    DESCRIPTION "Widget monitoring."
    REVISION "202408260000Z"
    DESCRIPTION "First revision."
    ::= { enterprises 4242 }

acmeWidgets OBJECT IDENTIFIER ::= { acmeWidgetMIB 1 }

acmeWidgetCount OBJECT-TYPE
    SYNTAX Counter32
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION
        "Widgets produced since restart."
    ::= { acmeWidgets 1 }

acmeWidgetTable OBJECT-TYPE
    SYNTAX SEQUENCE OF AcmeWidgetEntry
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "One row per widget."
    ::= { acmeWidgets 2 }

acmeWidgetEntry OBJECT-TYPE
    SYNTAX AcmeWidgetEntry
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "A widget row."
    INDEX { acmeWidgetIndex }
    ::= { acmeWidgetTable 1 }

AcmeWidgetEntry ::= SEQUENCE {
    acmeWidgetIndex   Integer32,
    acmeWidgetName    DisplayString
}

acmeWidgetIndex OBJECT-TYPE
    SYNTAX Integer32 (1..2147483647)
    MAX-ACCESS not-accessible
    STATUS current
    DESCRIPTION "Row index."
    ::= { acmeWidgetEntry 1 }

acmeWidgetName OBJECT-TYPE
    SYNTAX DisplayString
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Widget name."
    ::= { acmeWidgetEntry 2 }

acmeWidgetAlert NOTIFICATION-TYPE
    OBJECTS { acmeWidgetName }
    STATUS current
    DESCRIPTION "A widget misbehaved."
    ::= { acmeWidgets 3 }

END
"#;

/// SMIv1-era module: EXPORTS clause, ACCESS instead of MAX-ACCESS, and a
/// TRAP-TYPE that must be skipped without a declaration.
const GIZMO: &str = r#"
LEGACY-GIZMO-MIB DEFINITIONS ::= BEGIN

EXPORTS gizmo, gizmoStatus;

IMPORTS
    enterprises FROM SNMPv2-SMI
    OBJECT-TYPE FROM RFC-1212;

gizmo OBJECT IDENTIFIER ::= { enterprises 4343 }

gizmoStatus OBJECT-TYPE
    SYNTAX INTEGER { up(1), down(2) }
    ACCESS read-only
    STATUS mandatory
    DESCRIPTION "Current gizmo state."
    ::= { gizmo 1 }

gizmoFailure TRAP-TYPE
    ENTERPRISE gizmo
    DESCRIPTION "Gizmo went down."
    ::= 7

END
"#;

fn path(resolver: &Resolver, symbol: &str) -> String {
    resolver.find(symbol, None).unwrap().oid.to_dotted()
}

#[test]
fn test_base_module_reaches_enterprises() {
    let mut resolver = Resolver::new();
    let name = resolver.load_text(BASE).unwrap();
    assert_eq!(name, "SNMPv2-SMI");
    assert_eq!(path(&resolver, "enterprises"), ".1.3.6.1.4.1");
    assert_eq!(path(&resolver, "transmission"), ".1.3.6.1.2.1.10");
    assert_eq!(path(&resolver, "snmpModules"), ".1.3.6.1.6.3");
}

#[test]
fn test_batch_load_is_order_independent() {
    // Dependents first: resolution must pull the base module in on demand.
    let mut resolver = Resolver::new();
    resolver.load_all([WIDGET, GIZMO, BASE]).unwrap();

    assert_eq!(path(&resolver, "acmeWidgetMIB"), ".1.3.6.1.4.1.4242");
    assert_eq!(path(&resolver, "acmeWidgetName"), ".1.3.6.1.4.1.4242.1.2.1.2");
    assert_eq!(path(&resolver, "acmeWidgetAlert"), ".1.3.6.1.4.1.4242.1.3");
    assert_eq!(path(&resolver, "gizmoStatus"), ".1.3.6.1.4.1.4343.1");

    let anchor = resolver.anchor("ACME-WIDGET-MIB").unwrap().unwrap();
    assert_eq!(anchor.symbol(), "acmeWidgetMIB");
    assert_eq!(anchor.oid.to_dotted(), ".1.3.6.1.4.1.4242");

    // Imports from modules that are not in the batch are tolerated.
    assert!(resolver.missing_imports().contains(&MissingImport {
        importer: "ACME-WIDGET-MIB".to_string(),
        module: "SNMPv2-TC".to_string(),
    }));
    assert!(resolver.missing_imports().contains(&MissingImport {
        importer: "LEGACY-GIZMO-MIB".to_string(),
        module: "RFC-1212".to_string(),
    }));
}

#[test]
fn test_declaration_metadata_survives_resolution() {
    let mut resolver = Resolver::new();
    resolver.load_all([BASE, WIDGET]).unwrap();

    let count = resolver.find("acmeWidgetCount", None).unwrap();
    let decl = &count.declaration;
    assert_eq!(decl.access.as_deref(), Some("read-only"));
    assert_eq!(decl.status.as_deref(), Some("current"));
    assert_eq!(
        decl.description.as_deref(),
        Some("Widgets produced since restart.")
    );
    assert_eq!(decl.syntax, Some(Syntax::Plain("Counter32".to_string())));

    let table = resolver.find("acmeWidgetTable", None).unwrap();
    assert_eq!(
        table.declaration.syntax,
        Some(Syntax::Table {
            element_type: "AcmeWidgetEntry".to_string(),
        })
    );

    // The definition description wins over the REVISION description.
    let identity = resolver.find("acmeWidgetMIB", None).unwrap();
    assert_eq!(
        identity.declaration.description.as_deref(),
        Some("Widget monitoring.")
    );
}

#[test]
fn test_smiv1_access_and_enum_syntax() {
    let mut resolver = Resolver::new();
    resolver.load_all([BASE, GIZMO]).unwrap();

    let status = resolver.find("gizmoStatus", None).unwrap();
    assert_eq!(status.declaration.access.as_deref(), Some("read-only"));
    assert_eq!(status.declaration.status.as_deref(), Some("mandatory"));
    assert_eq!(
        status.declaration.syntax,
        Some(Syntax::Plain("INTEGER { up(1), down(2) }".to_string()))
    );
}

#[test]
fn test_non_declarations_never_reach_the_tree() {
    let mut resolver = Resolver::new();
    resolver.load_all([BASE, WIDGET, GIZMO]).unwrap();

    // Type assignment, trap, and the zeroDotZero stub all stay out.
    for symbol in ["AcmeWidgetEntry", "gizmoFailure", "zeroDotZero"] {
        assert_eq!(
            resolver.find(symbol, None),
            Err(Error::NodeNotFound {
                symbol: symbol.to_string(),
                module: None,
            }),
            "{symbol} should not resolve"
        );
    }
    assert!(resolver
        .module("SNMPv2-SMI")
        .unwrap()
        .declaration("zeroDotZero")
        .is_none());
}

#[test]
fn test_reloading_a_batch_adds_nothing() {
    let mut resolver = Resolver::new();
    resolver.load_all([BASE, WIDGET]).unwrap();
    let count = resolver.tree().node_count();

    resolver.load_all([WIDGET, BASE]).unwrap();
    assert_eq!(resolver.tree().node_count(), count);
    assert_eq!(path(&resolver, "acmeWidgetMIB"), ".1.3.6.1.4.1.4242");
}

#[test]
fn test_scoped_search_is_module_local() {
    let mut resolver = Resolver::new();
    resolver.load_all([BASE, GIZMO]).unwrap();

    let scoped = resolver.find("gizmo", Some("LEGACY-GIZMO-MIB")).unwrap();
    assert_eq!(scoped.oid.to_dotted(), ".1.3.6.1.4.1.4343");

    assert_eq!(
        resolver.find("gizmo", Some("SNMPv2-SMI")),
        Err(Error::NodeNotFound {
            symbol: "gizmo".to_string(),
            module: Some("SNMPv2-SMI".to_string()),
        })
    );
}
