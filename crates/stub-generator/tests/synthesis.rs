//! End-to-end tests for stub synthesis over relation graphs.

use std::collections::HashSet;

use stub_core::{
    Bounds, Cardinality, EntityDefinition, EntitySchema, EnumValues, FieldDescriptor,
    GenerationMode, RelationDescriptor, RelationTarget, Representation, Stub, StubValue,
    SynthesisConfig, TypeRegistry,
};
use stub_generator::{GeneratorError, GeneratorOverrides, StubFactory, StubOptions};
use uuid::Uuid;

fn id_field() -> FieldDescriptor {
    FieldDescriptor::new("id", Representation::Text)
        .storage("uuid")
        .primary()
}

fn factory(entities: Vec<EntityDefinition>) -> StubFactory<EntitySchema> {
    let schema = EntitySchema::new(entities, Vec::new()).unwrap();
    StubFactory::from_schema(schema)
}

fn fixed_to_many(count: usize) -> SynthesisConfig {
    SynthesisConfig {
        to_many: Bounds::new(count, count),
        ..SynthesisConfig::default()
    }
}

#[test]
fn test_flat_entity_fields_all_defined() {
    let factory = factory(vec![EntityDefinition::new("Account")
        .field(id_field())
        .field(FieldDescriptor::new("email", Representation::Text).storage("varchar"))
        .field(FieldDescriptor::new("age", Representation::Number).storage("int"))
        .field(FieldDescriptor::new("verified", Representation::Boolean))
        .field(
            FieldDescriptor::new("status", Representation::Text)
                .storage("enum")
                .with_enum(EnumValues::list(["active", "inactive"])),
        )
        .field(
            FieldDescriptor::new("createdAt", Representation::Date)
                .mode(GenerationMode::CreateTimestamp),
        )
        .field(
            FieldDescriptor::new("updatedAt", Representation::Date)
                .mode(GenerationMode::UpdateTimestamp),
        )
        .field(
            FieldDescriptor::new("deletedAt", Representation::Date)
                .mode(GenerationMode::DeleteTimestamp),
        )]);

    let account = factory
        .create_one("Account", &StubOptions::default())
        .unwrap();

    assert_eq!(account.type_name(), "Account");
    for name in ["id", "email", "age", "verified", "status", "createdAt", "updatedAt"] {
        let value = account.get(name).unwrap_or_else(|| panic!("{name} not set"));
        assert!(!value.is_null(), "{name} is null");
    }
    assert_eq!(account.get("deletedAt"), Some(&StubValue::Null));

    let id = account.get("id").unwrap().as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    let age = account.get("age").unwrap().as_i64().unwrap();
    assert!((0..=999).contains(&age));

    let status = account.get("status").unwrap().as_str().unwrap();
    assert!(status == "active" || status == "inactive");
}

#[test]
fn test_preset_fields_are_kept() {
    let schema = EntitySchema::new(
        vec![EntityDefinition::new("Account")
            .field(id_field())
            .field(FieldDescriptor::new("email", Representation::Text))
            .field(FieldDescriptor::new("nickname", Representation::Text))],
        Vec::new(),
    )
    .unwrap();
    let mut factory = StubFactory::from_schema(schema);
    factory.registry_mut().register_entity_factory("Account", || {
        Stub::new("Account")
            .with("email", "fixed@example.com")
            .with("nickname", StubValue::Null)
    });

    let account = factory
        .create_one("Account", &StubOptions::default())
        .unwrap();

    assert_eq!(
        account.get("email"),
        Some(&StubValue::String("fixed@example.com".to_string()))
    );
    assert_eq!(account.get("nickname"), Some(&StubValue::Null));
    assert!(account.get("id").unwrap().as_str().is_some());
}

#[test]
fn test_mapping_enum_and_missing_enum() {
    let factory = factory(vec![
        EntityDefinition::new("Ticket").field(id_field()).field(
            FieldDescriptor::new("priority", Representation::Number)
                .storage("simple-enum")
                .with_enum(EnumValues::mapping([("Low", 1), ("High", 3)])),
        ),
        EntityDefinition::new("Broken")
            .field(id_field())
            .field(FieldDescriptor::new("kind", Representation::Text).storage("enum")),
    ]);

    for _ in 0..10 {
        let ticket = factory.create_one("Ticket", &StubOptions::default()).unwrap();
        let priority = ticket.get("priority").unwrap().as_i64().unwrap();
        assert!(priority == 1 || priority == 3);
    }

    let err = factory
        .create_one("Broken", &StubOptions::default())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::MissingEnumValues(ref name) if name == "kind"));
    assert_eq!(err.to_string(), "Enum for field \"kind\" was not provided");
}

#[test]
fn test_create_many_returns_independent_stubs() {
    let factory = factory(vec![EntityDefinition::new("Account").field(id_field())]);

    let accounts = factory
        .create_many("Account", Some(5), &StubOptions::default())
        .unwrap();

    assert_eq!(accounts.len(), 5);
    let ids: HashSet<&str> = accounts
        .iter()
        .map(|a| a.get("id").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_create_many_default_count_within_bounds() {
    let factory = factory(vec![EntityDefinition::new("Account").field(id_field())]);

    for _ in 0..10 {
        let accounts = factory
            .create_many("Account", None, &StubOptions::default())
            .unwrap();
        assert!((3..=10).contains(&accounts.len()));
    }
}

#[test]
fn test_shallow_skips_relations() {
    let factory = factory(vec![
        EntityDefinition::new("User")
            .field(id_field())
            .relation(RelationDescriptor::to_many("posts", "Post"))
            .relation(RelationDescriptor::to_one("profile", "Profile")),
        EntityDefinition::new("Post").field(id_field()),
        EntityDefinition::new("Profile").field(id_field()),
    ]);

    let user = factory.create_one("User", &StubOptions::shallow()).unwrap();

    assert!(user.is_set("id"));
    assert!(!user.is_set("posts"));
    assert!(!user.is_set("profile"));
}

#[test]
fn test_self_reference_terminates() {
    let factory = factory(vec![EntityDefinition::new("Category")
        .field(id_field())
        .relation(RelationDescriptor::to_one("parent", "Category"))
        .relation(RelationDescriptor::to_many("children", "Category"))]);

    let category = factory
        .create_one("Category", &StubOptions::default())
        .unwrap();

    assert!(category.is_set("id"));
    assert!(!category.is_set("parent"));
    assert!(!category.is_set("children"));
}

#[test]
fn test_ancestor_relation_to_subtype_terminates() {
    let factory = factory(vec![
        EntityDefinition::new("Base")
            .field(id_field())
            .relation(RelationDescriptor::to_one("latest", "Admin")),
        EntityDefinition::new("Admin").extends("Base"),
    ]);
    let options = StubOptions::default().with_seed(1);

    let admin = factory.create_one("Admin", &options).unwrap();
    assert!(admin.is_set("id"));
    assert!(!admin.is_set("latest"));

    let base = factory.create_one("Base", &options).unwrap();
    let latest = base.get_stub("latest").unwrap();
    assert_eq!(latest.type_name(), "Admin");
    assert!(latest.is_set("id"));
    assert!(!latest.is_set("latest"));
}

#[test]
fn test_inherited_relation_to_own_subtype_terminates() {
    let factory = factory(vec![
        EntityDefinition::new("A")
            .field(id_field())
            .relation(RelationDescriptor::to_one("child", "B"))
            .relation(RelationDescriptor::to_many("children", "B")),
        EntityDefinition::new("B").extends("A"),
    ]);
    let factory = factory.with_config(fixed_to_many(2)).unwrap();

    let b = factory.create_one("B", &StubOptions::default()).unwrap();
    assert!(!b.is_set("child"));
    assert!(!b.is_set("children"));

    let a = factory.create_one("A", &StubOptions::default()).unwrap();
    let child = a.get_stub("child").unwrap();
    assert_eq!(child.type_name(), "B");
    assert!(!child.is_set("child"));
    assert!(!child.is_set("children"));

    let children = a.get_stubs("children").unwrap();
    assert_eq!(children.len(), 2);
    for child in children {
        assert!(!child.is_set("child"));
    }
}

#[test]
fn test_three_way_cycle_terminates() {
    let factory = factory(vec![
        EntityDefinition::new("A")
            .field(id_field())
            .relation(RelationDescriptor::to_one("b", "B")),
        EntityDefinition::new("B")
            .field(id_field())
            .relation(RelationDescriptor::to_one("c", "C")),
        EntityDefinition::new("C")
            .field(id_field())
            .relation(RelationDescriptor::to_one("a", "A")),
    ]);

    let a = factory.create_one("A", &StubOptions::default()).unwrap();

    let b = a.get_stub("b").unwrap();
    let c = b.get_stub("c").unwrap();
    assert_eq!(c.type_name(), "C");
    assert!(!c.is_set("a"));
}

#[test]
fn test_to_one_join_field_matches_related_key() {
    let factory = factory(vec![
        EntityDefinition::new("User")
            .field(id_field())
            .field(FieldDescriptor::new("profileId", Representation::Text))
            .relation(RelationDescriptor::to_one("profile", "Profile").join_on("profileId")),
        EntityDefinition::new("Profile")
            .field(id_field())
            .relation(RelationDescriptor::to_one("user", "User")),
    ]);

    let user = factory.create_one("User", &StubOptions::default()).unwrap();

    let profile = user.get_stub("profile").unwrap();
    assert_eq!(user.get("profileId"), profile.get("id"));
    assert!(!profile.is_set("user"));
}

#[test]
fn test_to_one_back_reference_on_related_side() {
    let factory = factory(vec![
        EntityDefinition::new("User")
            .field(id_field())
            .relation(RelationDescriptor::to_one("profile", "Profile")),
        EntityDefinition::new("Profile")
            .field(id_field())
            .field(FieldDescriptor::new("userId", Representation::Text))
            .relation(RelationDescriptor::to_one("user", "User").join_on("userId")),
    ]);

    let user = factory.create_one("User", &StubOptions::default()).unwrap();

    let profile = user.get_stub("profile").unwrap();
    assert_eq!(profile.get("userId"), user.get("id"));
}

#[test]
fn test_to_many_children_reference_parent() {
    let factory = factory(vec![
        EntityDefinition::new("Author")
            .field(id_field())
            .relation(RelationDescriptor::to_many("books", "Book")),
        EntityDefinition::new("Book")
            .field(id_field())
            .field(FieldDescriptor::new("authorId", Representation::Text))
            .relation(RelationDescriptor::to_one("author", "Author").join_on("authorId")),
    ])
    .with_config(fixed_to_many(4))
    .unwrap();

    let author = factory.create_one("Author", &StubOptions::default()).unwrap();

    let books = author.get_stubs("books").unwrap();
    assert_eq!(books.len(), 4);
    for book in &books {
        assert_eq!(book.get("authorId"), author.get("id"));
        assert!(!book.is_set("author"));
    }

    let ids: HashSet<&str> = books
        .iter()
        .map(|b| b.get("id").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_to_many_siblings_expand_independently() {
    let factory = factory(vec![
        EntityDefinition::new("Author")
            .field(id_field())
            .relation(RelationDescriptor::to_many("books", "Book")),
        EntityDefinition::new("Book")
            .field(id_field())
            .relation(RelationDescriptor::to_one("publisher", "Publisher")),
        EntityDefinition::new("Publisher").field(id_field()),
    ])
    .with_config(fixed_to_many(3))
    .unwrap();

    let author = factory.create_one("Author", &StubOptions::default()).unwrap();

    let books = author.get_stubs("books").unwrap();
    assert_eq!(books.len(), 3);
    for book in books {
        assert_eq!(book.get_stub("publisher").unwrap().type_name(), "Publisher");
    }
}

#[test]
fn test_composite_primary_key_wired_positionally() {
    let factory = factory(vec![
        EntityDefinition::new("Order")
            .field(FieldDescriptor::new("tenant", Representation::Text).primary())
            .field(
                FieldDescriptor::new("number", Representation::Number)
                    .storage("int")
                    .primary(),
            ),
        EntityDefinition::new("OrderLine")
            .field(id_field())
            .field(FieldDescriptor::new("orderTenant", Representation::Text))
            .field(FieldDescriptor::new("orderNumber", Representation::Number))
            .relation(
                RelationDescriptor::to_one("order", "Order")
                    .join_on("orderTenant")
                    .join_on("orderNumber"),
            ),
    ]);

    let line = factory
        .create_one("OrderLine", &StubOptions::default())
        .unwrap();

    let order = line.get_stub("order").unwrap();
    assert_eq!(line.get("orderTenant"), order.get("tenant"));
    assert_eq!(line.get("orderNumber"), order.get("number"));
}

#[test]
fn test_inherited_relation_is_expanded() {
    let factory = factory(vec![
        EntityDefinition::new("Owned")
            .field(id_field())
            .field(FieldDescriptor::new("orgId", Representation::Text))
            .relation(RelationDescriptor::to_one("org", "Org").join_on("orgId")),
        EntityDefinition::new("Document")
            .extends("Owned")
            .field(FieldDescriptor::new("title", Representation::Text)),
        EntityDefinition::new("Org").field(id_field()),
    ]);

    let doc = factory.create_one("Document", &StubOptions::default()).unwrap();

    assert!(doc.is_set("title"));
    let org = doc.get_stub("org").unwrap();
    assert_eq!(doc.get("orgId"), org.get("id"));
}

#[test]
fn test_preset_join_field_not_overwritten() {
    let schema = EntitySchema::new(
        vec![
            EntityDefinition::new("User")
                .field(id_field())
                .relation(RelationDescriptor::to_many("posts", "Post")),
            EntityDefinition::new("Post")
                .field(id_field())
                .field(FieldDescriptor::new("userId", Representation::Text))
                .relation(RelationDescriptor::to_one("user", "User").join_on("userId")),
        ],
        Vec::new(),
    )
    .unwrap();
    let mut factory = StubFactory::from_schema(schema);
    factory
        .registry_mut()
        .register_entity_factory("Post", || Stub::new("Post").with("userId", "pinned"));

    let user = factory.create_one("User", &StubOptions::default()).unwrap();

    for post in user.get_stubs("posts").unwrap() {
        assert_eq!(post.get("userId"), Some(&StubValue::String("pinned".into())));
    }
}

#[test]
fn test_lazy_and_unregistered_targets() {
    let schema = EntitySchema::new(
        vec![
            EntityDefinition::new("Invoice")
                .field(id_field())
                .relation(RelationDescriptor::new(
                    "customer",
                    Cardinality::ToOne,
                    RelationTarget::lazy(|| Some("Customer".to_string())),
                ))
                .relation(RelationDescriptor::new(
                    "ghost",
                    Cardinality::ToOne,
                    RelationTarget::lazy(|| None),
                ))
                .relation(RelationDescriptor::to_one("audit", "Audit")),
            EntityDefinition::new("Customer").field(id_field()),
            EntityDefinition::new("Audit").field(id_field()),
        ],
        Vec::new(),
    )
    .unwrap();

    let mut registry = TypeRegistry::new();
    registry.register_entity("Invoice").register_entity("Customer");
    let factory = StubFactory::new(schema, registry);

    let invoice = factory.create_one("Invoice", &StubOptions::default()).unwrap();

    assert_eq!(invoice.get_stub("customer").unwrap().type_name(), "Customer");
    assert!(!invoice.is_set("ghost"));
    assert!(!invoice.is_set("audit"));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let factory = factory(vec![
        EntityDefinition::new("Author")
            .field(id_field())
            .field(FieldDescriptor::new("name", Representation::Text))
            .relation(RelationDescriptor::to_many("books", "Book")),
        EntityDefinition::new("Book")
            .field(id_field())
            .field(FieldDescriptor::new("pages", Representation::Number))
            .field(FieldDescriptor::new("tags", Representation::Text).array()),
    ]);

    let options = StubOptions::default().with_seed(42);
    let first = factory.create_many("Author", Some(3), &options).unwrap();
    let second = factory.create_many("Author", Some(3), &options).unwrap();
    assert_eq!(first, second);

    let other = factory
        .create_one("Author", &StubOptions::default().with_seed(43))
        .unwrap();
    assert_ne!(first[0].get("id"), other.get("id"));
}

#[test]
fn test_overrides_apply_to_related_stubs() {
    let fixed = Uuid::parse_str("6f1c2a4e-0d3b-4c8e-9a7f-1b2c3d4e5f60").unwrap();
    let factory = factory(vec![
        EntityDefinition::new("User")
            .field(id_field())
            .relation(RelationDescriptor::to_one("profile", "Profile")),
        EntityDefinition::new("Profile").field(id_field()),
    ])
    .with_overrides(GeneratorOverrides::new().with_uuid(move |_, _| fixed));

    let user = factory.create_one("User", &StubOptions::default()).unwrap();

    let expected = StubValue::String(fixed.to_string());
    assert_eq!(user.get("id"), Some(&expected));
    assert_eq!(user.get_stub("profile").unwrap().get("id"), Some(&expected));
}

#[test]
fn test_concurrent_creation() {
    let factory = factory(vec![
        EntityDefinition::new("User")
            .field(id_field())
            .relation(RelationDescriptor::to_many("posts", "Post")),
        EntityDefinition::new("Post")
            .field(id_field())
            .field(FieldDescriptor::new("userId", Representation::Text))
            .relation(RelationDescriptor::to_one("user", "User").join_on("userId")),
    ]);

    let batches: Vec<Vec<Stub>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    factory
                        .create_many("User", Some(10), &StubOptions::default())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut ids = HashSet::new();
    for user in batches.iter().flatten() {
        let id = user.get("id").unwrap().as_str().unwrap().to_string();
        for post in user.get_stubs("posts").unwrap() {
            assert_eq!(post.get("userId").unwrap().as_str(), Some(id.as_str()));
        }
        assert!(ids.insert(id));
    }
    assert_eq!(ids.len(), 80);
}

#[test]
fn test_yaml_schema_end_to_end() {
    let schema = EntitySchema::from_yaml(
        r#"
seed: 5
synthesis:
  to_many:
    min: 2
    max: 2
entities:
  - name: Team
    fields:
      - name: id
        type: text
        storage: uuid
        primary: true
      - name: name
        type: text
      - name: archivedAt
        type: date
        mode: delete_timestamp
    relations:
      - name: members
        kind: to_many
        target: Member
  - name: Member
    fields:
      - name: id
        type: text
        storage: uuid
        primary: true
      - name: teamId
        type: text
      - name: role
        type: text
        storage: enum
        enum: [owner, editor, viewer]
    relations:
      - name: team
        kind: to_one
        target: Team
        join_fields:
          - name: teamId
"#,
    )
    .unwrap();
    let seed = schema.seed;
    let factory = StubFactory::from_schema(schema);

    let team = factory
        .create_one(
            "Team",
            &StubOptions {
                seed,
                ..StubOptions::default()
            },
        )
        .unwrap();

    assert_eq!(team.get("archivedAt"), Some(&StubValue::Null));
    let members = team.get_stubs("members").unwrap();
    assert_eq!(members.len(), 2);
    for member in members {
        assert_eq!(member.get("teamId"), team.get("id"));
        let role = member.get("role").unwrap().as_str().unwrap();
        assert!(["owner", "editor", "viewer"].contains(&role));
    }
}
