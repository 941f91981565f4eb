//! End-to-end generation from an on-disk corpus.

use cdmgen_corpus::StoreError;
use cdmgen_typegen::{
    Declaration, GenerateError, GenerateOptions, Generator, ScalarType, generate_csharp,
    get_backend,
};
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: serde_json::Value) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "sales.manifest.cdm.json",
        serde_json::json!({
            "manifestName": "sales",
            "entities": [
                { "entityName": "Order", "entityPath": "sales/Order.cdm.json/Order" },
                { "entityName": "Customer", "entityPath": "app/Customer.cdm.json/Customer" }
            ],
            "subManifests": [
                { "manifestName": "common", "definition": "common/common.manifest.cdm.json" }
            ]
        }),
    );
    write(
        root,
        "common/common.manifest.cdm.json",
        serde_json::json!({
            "manifestName": "common",
            "entities": [
                { "entityName": "Currency", "entityPath": "Currency.cdm.json/Currency" }
            ]
        }),
    );
    write(
        root,
        "common/Currency.cdm.json",
        serde_json::json!({
            "definitions": [{
                "entityName": "Currency",
                "hasAttributes": [
                    { "name": "code", "dataFormat": "String" },
                    { "name": "rate", "dataFormat": "Decimal" }
                ]
            }]
        }),
    );
    write(
        root,
        "app/Customer.cdm.json",
        serde_json::json!({
            "definitions": [{
                "entityName": "Customer",
                "displayName": "Customer",
                "hasAttributes": [
                    { "name": "name", "dataType": "name" },
                    { "name": "class", "dataType": "string" }
                ]
            }]
        }),
    );
    write(
        root,
        "sales/Order.cdm.json",
        serde_json::json!({
            "definitions": [
                {
                    "attributeGroupName": "auditFields",
                    "members": [{ "name": "createdOn", "dataType": "dateTime" }]
                },
                {
                    "entityName": "Order",
                    "description": "A sales order",
                    "hasAttributes": [
                        { "name": "orderId", "dataType": "entityId", "description": "Primary key" },
                        {
                            "name": "total",
                            "dataType": { "dataTypeReference": "currency" },
                            "displayName": "Order Total"
                        },
                        {
                            "name": "customerId",
                            "dataType": "entityId",
                            "appliedTraits": [{
                                "traitReference": "is.linkedEntity.identifier",
                                "arguments": [{
                                    "entityReference": {
                                        "entityShape": "entityGroupSet",
                                        "constantValues": [["app/customer/Customer", "customerId"]]
                                    }
                                }]
                            }]
                        },
                        { "attributeGroupReference": "auditFields" }
                    ]
                }
            ]
        }),
    );
    dir
}

fn generate(dir: &Path, manifest: &str) -> Result<Vec<Declaration>, GenerateError> {
    let mut declarations = Vec::new();
    Generator::new(GenerateOptions::default()).generate_from_dir(dir, manifest, |d| {
        declarations.push(d.clone())
    })?;
    Ok(declarations)
}

#[test]
fn generates_whole_tree() {
    let dir = corpus();
    let declarations = generate(dir.path(), "sales.manifest.cdm.json").unwrap();
    let names: Vec<_> = declarations.iter().map(Declaration::qualified_name).collect();
    assert_eq!(names, ["common.Currency", "app.Customer", "sales.Order"]);

    let currency = &declarations[0];
    assert_eq!(currency.properties[1].ty, cdmgen_typegen::PropertyType::Scalar(ScalarType::Decimal));

    let customer = &declarations[1];
    assert_eq!(customer.docs, "Customer");
    assert!(customer.property("@class").is_some());
}

#[test]
fn order_renders_as_csharp() {
    let dir = corpus();
    let declarations = generate(dir.path(), "sales.manifest.cdm.json").unwrap();
    let order = declarations.iter().find(|d| d.name == "Order").unwrap();

    insta::assert_snapshot!(generate_csharp(order), @r"
    using System;
    using System.Collections.Generic;

    namespace sales
    {
        /// <summary>
        /// A sales order
        /// </summary>
        public class Order
        {
            /// <summary>
            /// Primary key
            /// </summary>
            public Guid orderId { get; set; }

            /// <summary>
            /// Order Total
            /// </summary>
            public decimal total { get; set; }

            /// <summary>
            /// No description available.
            /// </summary>
            public app.Customer customerId { get; set; }

            /// <summary>
            /// No description available.
            /// </summary>
            public DateTime createdOn { get; set; }
        }
    }
    ");
}

#[test]
fn registry_backends_render_declarations() {
    let dir = corpus();
    let declarations = generate(dir.path(), "sales.manifest.cdm.json").unwrap();
    let json = get_backend("json").unwrap();
    let rendered = json.generate(&declarations[0]);
    let parsed: Declaration = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed, declarations[0]);
    assert_eq!(get_backend("csharp").unwrap().extension(), "cs");
}

#[test]
fn missing_manifest_file_is_fatal() {
    let dir = corpus();
    assert!(matches!(
        generate(dir.path(), "nope.manifest.cdm.json"),
        Err(GenerateError::RootNotFound(_))
    ));
    assert!(matches!(
        generate(dir.path(), "  "),
        Err(GenerateError::EmptyManifestArgument)
    ));
}

#[test]
fn unknown_attribute_group_is_fatal() {
    let dir = corpus();
    write(
        dir.path(),
        "broken.manifest.cdm.json",
        serde_json::json!({
            "entities": [{ "entityName": "Broken", "entityPath": "Broken.cdm.json/Broken" }]
        }),
    );
    write(
        dir.path(),
        "Broken.cdm.json",
        serde_json::json!({
            "definitions": [{
                "entityName": "Broken",
                "hasAttributes": [{ "attributeGroupReference": "missingGroup" }]
            }]
        }),
    );
    match generate(dir.path(), "broken.manifest.cdm.json") {
        Err(GenerateError::Store(StoreError::UnknownAttributeGroup { name, .. })) => {
            assert_eq!(name, "missingGroup")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn case_variant_sub_manifests_are_walked_once() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "hub.manifest.cdm.json",
        serde_json::json!({
            "subManifests": [
                { "definition": "shared/shared.manifest.cdm.json" },
                { "definition": "Shared/Shared.manifest.cdm.json" }
            ]
        }),
    );
    write(
        root,
        "shared/shared.manifest.cdm.json",
        serde_json::json!({
            "entities": [{ "entityName": "Currency", "entityPath": "Currency.cdm.json/Currency" }]
        }),
    );
    write(
        root,
        "shared/Currency.cdm.json",
        serde_json::json!({
            "definitions": [{
                "entityName": "Currency",
                "hasAttributes": [{ "name": "code", "dataType": "string" }]
            }]
        }),
    );

    let mut names = Vec::new();
    let summary = Generator::new(GenerateOptions::default())
        .generate_from_dir(root, "hub.manifest.cdm.json", |d| names.push(d.qualified_name()))
        .unwrap();
    assert_eq!(summary.manifests, 2);
    assert_eq!(summary.declarations, 1);
    assert_eq!(names, ["shared.Currency"]);
}
