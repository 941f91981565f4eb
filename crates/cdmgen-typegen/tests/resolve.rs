//! Resolution tests against an in-memory corpus.

use cdmgen_corpus::{
    ArgumentValue, AttributeGroup, AttributeGroupRef, EntityDef, ManifestDef, MemoryStore,
    SchemaStore, TraitReference, TypedAttribute,
};
use cdmgen_typegen::linked::LINKED_ENTITY_TRAIT;
use cdmgen_typegen::{
    Declaration, GenerateError, GenerateOptions, GenerateSummary, PropertyType, ScalarType,
    generate,
};

fn run(store: &MemoryStore, root: &str) -> Result<(Vec<Declaration>, GenerateSummary), GenerateError> {
    run_with(store, root, &GenerateOptions::default())
}

fn run_with(
    store: &MemoryStore,
    root: &str,
    options: &GenerateOptions,
) -> Result<(Vec<Declaration>, GenerateSummary), GenerateError> {
    let mut declarations = Vec::new();
    let root = store.parse_path(root);
    let summary = generate(store, &root, options, |d| declarations.push(d.clone()))?;
    Ok((declarations, summary))
}

fn string(name: &str) -> TypedAttribute {
    TypedAttribute::new(name).data_type("string")
}

fn linked_to(name: &str, reference: &str) -> TypedAttribute {
    TypedAttribute::new(name).data_type("entityId").applied_trait(
        TraitReference::new(LINKED_ENTITY_TRAIT)
            .argument(ArgumentValue::constant_entity([[reference, name]])),
    )
}

fn names(declarations: &[Declaration]) -> Vec<String> {
    declarations.iter().map(Declaration::qualified_name).collect()
}

fn property_names(declaration: &Declaration) -> Vec<&str> {
    declaration.properties.iter().map(|p| p.name.as_str()).collect()
}

// === Declarations ===

#[test]
fn customer_in_nested_folder() {
    let mut store = MemoryStore::new();
    store.add_entity(
        "/app/customer/Customer.cdm.json",
        EntityDef::new("Customer")
            .description("A person who buys things")
            .attribute(string("name"))
            .attribute(string("namespace")),
    );
    store.add_manifest(
        "/default.manifest.cdm.json",
        ManifestDef::new("default").entity("Customer", "app/customer/Customer.cdm.json/Customer"),
    );

    let (declarations, summary) = run(&store, "/default.manifest.cdm.json").unwrap();
    assert_eq!(summary, GenerateSummary { manifests: 1, declarations: 1 });

    let customer = &declarations[0];
    assert_eq!(customer.name, "Customer");
    assert_eq!(customer.namespace, "app.customer");
    assert_eq!(customer.docs, "A person who buys things");
    assert_eq!(property_names(customer), ["name", "@namespace"]);
    for property in &customer.properties {
        assert_eq!(property.ty, PropertyType::Scalar(ScalarType::String));
        assert_eq!(property.docs, "No description available.");
    }
}

#[test]
fn property_named_like_its_class_is_prefixed() {
    let mut store = MemoryStore::new();
    let entity = store.add_entity(
        "/Customer.cdm.json",
        EntityDef::new("Customer").attribute(string("Customer")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Customer", entity.to_string()),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(declarations[0].namespace, "");
    assert_eq!(property_names(&declarations[0]), ["_Customer"]);
}

#[test]
fn groups_expand_in_place_one_level_deep() {
    let nested = AttributeGroup::new("audit", vec![string("createdBy").into()]);
    let address = AttributeGroup::new(
        "address",
        vec![
            string("street").into(),
            string("city").into(),
            AttributeGroupRef::new(&nested).into(),
        ],
    );

    let mut store = MemoryStore::new();
    let entity = store.add_entity(
        "/crm/Contact.cdm.json",
        EntityDef::new("Contact")
            .attribute(TypedAttribute::new("id").data_type("guid"))
            .attribute(AttributeGroupRef::new(&address))
            .attribute(TypedAttribute::new("email").data_type("email")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Contact", entity.to_string()),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    let contact = &declarations[0];
    assert_eq!(property_names(contact), ["id", "street", "city", "email"]);
    assert_eq!(contact.properties[0].ty, PropertyType::Scalar(ScalarType::Guid));
}

#[test]
fn unknown_tag_uses_configured_fallback() {
    let mut store = MemoryStore::new();
    let entity = store.add_entity(
        "/Probe.cdm.json",
        EntityDef::new("Probe").attribute(TypedAttribute::new("reading").data_type("hologram")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Probe", entity.to_string()),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(
        declarations[0].properties[0].ty,
        PropertyType::Scalar(ScalarType::String)
    );

    let options = GenerateOptions {
        unknown_tag_fallback: ScalarType::Object,
        ..Default::default()
    };
    let (declarations, _) = run_with(&store, "/root.manifest.cdm.json", &options).unwrap();
    assert_eq!(
        declarations[0].properties[0].ty,
        PropertyType::Scalar(ScalarType::Object)
    );
}

#[test]
fn attribute_without_type_is_fatal() {
    let mut store = MemoryStore::new();
    let entity = store.add_entity(
        "/Probe.cdm.json",
        EntityDef::new("Probe").attribute(TypedAttribute::new("mystery")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Probe", entity.to_string()),
    );

    let err = run(&store, "/root.manifest.cdm.json").unwrap_err();
    match err {
        GenerateError::UnknownDataType { attribute, entity } => {
            assert_eq!(attribute, "mystery");
            assert!(entity.ends_with("/Probe.cdm.json/Probe"), "{entity}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// === Linked entities ===

fn order_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.add_entity(
        "/App/Customer.cdm.json",
        EntityDef::new("Customer").attribute(string("name")),
    );
    store.add_entity(
        "/sales/Order.cdm.json",
        EntityDef::new("Order")
            .attribute(TypedAttribute::new("total").data_type("currency"))
            .attribute(linked_to("customerId", "App/Customer/Customer")),
    );
    store
}

#[test]
fn linked_entity_is_generated_first() {
    let mut store = order_store();
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Order", "sales/Order.cdm.json/Order"),
    );

    let (declarations, summary) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["App.Customer", "sales.Order"]);
    assert_eq!(summary.declarations, 2);

    let order = &declarations[1];
    assert_eq!(
        order.property("customerId").unwrap().ty,
        PropertyType::Entity("App.Customer".into())
    );
    assert_eq!(
        order.property("total").unwrap().ty,
        PropertyType::Scalar(ScalarType::Decimal)
    );
}

#[test]
fn entity_reached_twice_is_emitted_once() {
    let mut store = order_store();
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root")
            .entity("Order", "sales/Order.cdm.json/Order")
            .entity("Customer", "App/Customer.cdm.json/Customer"),
    );

    let (declarations, summary) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["App.Customer", "sales.Order"]);
    assert_eq!(summary.declarations, 2);
}

#[test]
fn linked_documents_are_searched_under_prefixes() {
    let mut store = MemoryStore::new();
    store.add_entity(
        "/core/applicationCommon/Account.cdm.json",
        EntityDef::new("Account").attribute(string("name")),
    );
    let order = store.add_entity(
        "/Order.cdm.json",
        EntityDef::new("Order").attribute(linked_to("accountId", "account/Account")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Order", order.to_string()),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(
        names(&declarations),
        ["core.applicationCommon.Account", "Order"]
    );
}

#[test]
fn unresolvable_links_degrade() {
    let mut store = MemoryStore::new();
    let entity = store.add_entity(
        "/Order.cdm.json",
        EntityDef::new("Order")
            .attribute(linked_to("missingId", "Nowhere/Ghost/Ghost"))
            .attribute(linked_to("plainId", "Customer"))
            .attribute(
                TypedAttribute::new("brokenId").data_type("entityId").applied_trait(
                    TraitReference::new(LINKED_ENTITY_TRAIT)
                        .argument(ArgumentValue::Text("App/Customer/Customer".into())),
                ),
            ),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Order", entity.to_string()),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    let order = &declarations[0];
    assert_eq!(
        order.property("missingId").unwrap().ty,
        PropertyType::Scalar(ScalarType::Object)
    );
    assert_eq!(
        order.property("plainId").unwrap().ty,
        PropertyType::Entity("Customer".into())
    );
    assert_eq!(
        order.property("brokenId").unwrap().ty,
        PropertyType::UnknownEntity
    );
}

#[test]
fn cyclic_links_terminate() {
    let mut store = MemoryStore::new();
    store.add_entity(
        "/Graph/Node.cdm.json",
        EntityDef::new("Node").attribute(linked_to("edgeId", "Graph/Edge/Edge")),
    );
    store.add_entity(
        "/Graph/Edge.cdm.json",
        EntityDef::new("Edge").attribute(linked_to("nodeId", "Graph/Node/Node")),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Node", "Graph/Node.cdm.json/Node"),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["Graph.Edge", "Graph.Node"]);
    assert_eq!(
        declarations[0].property("nodeId").unwrap().ty,
        PropertyType::Entity("Graph.Node".into())
    );
    assert_eq!(
        declarations[1].property("edgeId").unwrap().ty,
        PropertyType::Entity("Graph.Edge".into())
    );
}

// === Manifests ===

#[test]
fn shared_sub_manifest_is_walked_once() {
    let mut store = MemoryStore::new();
    store.add_entity("/shared/Thing.cdm.json", EntityDef::new("Thing").attribute(string("label")));
    store.add_manifest(
        "/shared/shared.manifest.cdm.json",
        ManifestDef::new("shared").entity("Thing", "Thing.cdm.json/Thing"),
    );
    store.add_manifest(
        "/team/team.manifest.cdm.json",
        ManifestDef::new("team").sub_manifest("shared", "../shared/shared.manifest.cdm.json"),
    );
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root")
            .sub_manifest("shared", "shared/shared.manifest.cdm.json")
            .sub_manifest("team", "team/team.manifest.cdm.json"),
    );

    let (declarations, summary) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["shared.Thing"]);
    assert_eq!(summary, GenerateSummary { manifests: 3, declarations: 1 });
    assert_eq!(store.fetch_count("/shared/shared.manifest.cdm.json"), 1);
}

#[test]
fn manifest_cycle_terminates() {
    let mut store = MemoryStore::new();
    store.add_entity("/a/A.cdm.json", EntityDef::new("A").attribute(string("x")));
    store.add_entity("/b/B.cdm.json", EntityDef::new("B").attribute(string("y")));
    store.add_manifest(
        "/a/a.manifest.cdm.json",
        ManifestDef::new("a")
            .sub_manifest("b", "/b/b.manifest.cdm.json")
            .entity("A", "A.cdm.json/A"),
    );
    store.add_manifest(
        "/b/b.manifest.cdm.json",
        ManifestDef::new("b")
            .sub_manifest("a", "/a/a.manifest.cdm.json")
            .entity("B", "B.cdm.json/B"),
    );

    let (declarations, summary) = run(&store, "/a/a.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["b.B", "a.A"]);
    assert_eq!(summary.manifests, 2);
    assert_eq!(store.fetch_count("/a/a.manifest.cdm.json"), 1);
    assert_eq!(store.fetch_count("/b/b.manifest.cdm.json"), 1);
}

#[test]
fn missing_entity_is_skipped() {
    let mut store = MemoryStore::new();
    store.add_entity("/Real.cdm.json", EntityDef::new("Real").attribute(string("x")));
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root")
            .entity("Ghost", "Ghost.cdm.json/Ghost")
            .entity("Real", "Real.cdm.json/Real"),
    );

    let (declarations, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["Real"]);
}

#[test]
fn empty_manifest_is_fatal() {
    let mut store = MemoryStore::new();
    store.add_manifest("/root.manifest.cdm.json", ManifestDef::new("root"));
    assert!(matches!(
        run(&store, "/root.manifest.cdm.json"),
        Err(GenerateError::EmptyManifest(_))
    ));
}

#[test]
fn missing_manifest_is_fatal() {
    let store = MemoryStore::new();
    match run(&store, "/nope.manifest.cdm.json") {
        Err(GenerateError::ManifestNotFound(path)) => {
            assert_eq!(path, "local:/nope.manifest.cdm.json")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_manifest_falls_back_to_common_folder() {
    let mut store = MemoryStore::new();
    store.add_entity(
        "/core/applicationCommon/Account.cdm.json",
        EntityDef::new("Account").attribute(string("name")),
    );
    store.add_manifest(
        "/core/applicationCommon/foundation.manifest.cdm.json",
        ManifestDef::new("foundation").entity("Account", "Account.cdm.json/Account"),
    );

    let (declarations, _) = run(&store, "/foundation.manifest.cdm.json").unwrap();
    assert_eq!(names(&declarations), ["core.applicationCommon.Account"]);
}

#[test]
fn runs_do_not_share_state() {
    let mut store = order_store();
    store.add_manifest(
        "/root.manifest.cdm.json",
        ManifestDef::new("root").entity("Order", "sales/Order.cdm.json/Order"),
    );

    let (first, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    let (second, _) = run(&store, "/root.manifest.cdm.json").unwrap();
    assert_eq!(first, second);
    assert_eq!(store.fetch_count("/root.manifest.cdm.json"), 2);
}
