//! Graph synthesizer.
//!
//! Populates a stub level by level (farthest ancestor first, then the entity
//! itself) and, when deep, expands relations into related stubs. Expansion
//! terminates through the visited chain: a relation is skipped when its
//! target is the level being processed, the concrete type being built, or
//! any type already on the chain. Related
//! stubs are wired to their origin through join fields, in both directions
//! for to-one relations and from child to parent for to-many relations.

use std::collections::HashSet;

use rand::RngCore;
use stub_core::{
    storage_class, Cardinality, FieldDescriptor, GenerationMode, JoinFieldDescriptor,
    RelationDescriptor, Representation, SchemaIntrospector, StorageClass, Stub, StubValue,
    SynthesisConfig, TypeRegistry, ValueCategory,
};
use tracing::trace;

use crate::generator::{GeneratorError, ValueGenerator};
use crate::options::StubOptions;

/// Parent side of a relation being expanded.
struct Origin<'s> {
    entity: &'s str,
    primary_fields: &'s [&'s FieldDescriptor],
    stub: &'s Stub,
}

/// Builds populated stub graphs from schema metadata.
pub struct GraphSynthesizer<'a> {
    schema: &'a dyn SchemaIntrospector,
    registry: &'a TypeRegistry,
    generator: &'a dyn ValueGenerator,
    config: SynthesisConfig,
}

impl<'a> GraphSynthesizer<'a> {
    /// Create a synthesizer over the given schema, registry and generator.
    pub fn new(
        schema: &'a dyn SchemaIntrospector,
        registry: &'a TypeRegistry,
        generator: &'a dyn ValueGenerator,
        config: SynthesisConfig,
    ) -> Self {
        Self {
            schema,
            registry,
            generator,
            config,
        }
    }

    /// Synthesis tunables in use.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Instantiate `entity` from the registry and populate it.
    pub fn synthesize(
        &self,
        entity: &str,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Stub, GeneratorError> {
        let mut visited = Vec::new();
        let (stub, _) = self.instantiate_and_populate(entity, &mut visited, options, rng)?;
        Ok(stub)
    }

    /// Populate an existing stub as `entity`.
    ///
    /// Fields already present on `stub` are treated as preset and are never
    /// overwritten.
    pub fn synthesize_into(
        &self,
        stub: &mut Stub,
        entity: &str,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(), GeneratorError> {
        let preset: HashSet<String> = stub.field_names().map(str::to_string).collect();
        let mut visited = Vec::new();
        self.synthesize_entity(stub, entity, &mut visited, &preset, options, rng)
    }

    fn instantiate_and_populate(
        &self,
        entity: &str,
        visited: &mut Vec<String>,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(Stub, HashSet<String>), GeneratorError> {
        let mut stub = self
            .registry
            .instantiate(entity)
            .ok_or_else(|| GeneratorError::EntityNotFound(entity.to_string()))?;
        let preset: HashSet<String> = stub.field_names().map(str::to_string).collect();

        self.synthesize_entity(&mut stub, entity, visited, &preset, options, rng)?;
        Ok((stub, preset))
    }

    fn synthesize_entity(
        &self,
        stub: &mut Stub,
        entity: &str,
        visited: &mut Vec<String>,
        preset: &HashSet<String>,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(), GeneratorError> {
        let mut levels = self.schema.ancestry(entity);
        levels.reverse();
        levels.push(entity);

        for level in levels {
            self.populate_fields(stub, level, rng)?;
            if options.deep {
                self.populate_relations(stub, entity, level, visited, preset, options, rng)?;
            }
        }
        Ok(())
    }

    fn populate_fields(
        &self,
        stub: &mut Stub,
        entity: &str,
        rng: &mut dyn RngCore,
    ) -> Result<(), GeneratorError> {
        for field in self.schema.fields_of(entity) {
            if stub.is_set(&field.property) {
                continue;
            }
            let value = self.field_value(field, rng)?;
            stub.set(field.property.clone(), value);
        }
        Ok(())
    }

    /// Value for one field, resolved in priority order: generation mode,
    /// storage keyword, then representation.
    fn field_value(
        &self,
        field: &FieldDescriptor,
        rng: &mut dyn RngCore,
    ) -> Result<StubValue, GeneratorError> {
        match field.mode {
            GenerationMode::CreateTimestamp | GenerationMode::UpdateTimestamp => {
                return self.generator.generate(
                    field,
                    ValueCategory::Date,
                    &field.representation,
                    rng,
                );
            }
            GenerationMode::DeleteTimestamp => return Ok(StubValue::Null),
            GenerationMode::Regular => {}
        }

        if let Some(class) = field.options.storage_type.as_deref().and_then(storage_class) {
            return match class {
                StorageClass::Category(category) => {
                    self.generator
                        .generate(field, category, &field.representation, rng)
                }
                StorageClass::EmptySequence => Ok(StubValue::Array(Vec::new())),
            };
        }

        self.representation_value(field, &field.representation, rng, &mut Vec::new())
    }

    fn representation_value(
        &self,
        field: &FieldDescriptor,
        representation: &Representation,
        rng: &mut dyn RngCore,
        composites: &mut Vec<String>,
    ) -> Result<StubValue, GeneratorError> {
        if let Some(category) = representation.category() {
            return self.generator.generate(field, category, representation, rng);
        }

        let structured = matches!(
            representation,
            Representation::Composite { .. } | Representation::Producer { .. }
        );
        if field.options.array && structured {
            let bounds = self.generator.array_length();
            let length = self
                .generator
                .generate_random_number(bounds.min as i64, bounds.max as i64, rng)
                .max(0);

            let mut items = Vec::with_capacity(length as usize);
            for _ in 0..length {
                items.push(self.structured_value(representation, rng, composites)?);
            }
            return Ok(StubValue::Array(items));
        }

        self.structured_value(representation, rng, composites)
    }

    fn structured_value(
        &self,
        representation: &Representation,
        rng: &mut dyn RngCore,
        composites: &mut Vec<String>,
    ) -> Result<StubValue, GeneratorError> {
        match representation {
            Representation::Composite { name } => self.populate_composite(name, rng, composites),
            Representation::Producer { name } => {
                Ok(self.registry.produce(name).unwrap_or(StubValue::Null))
            }
            _ => Ok(StubValue::Array(Vec::new())),
        }
    }

    /// Build a composite value from its registered template.
    ///
    /// Properties already present on the template, including explicit nulls,
    /// are kept. A composite nested inside itself resolves to null.
    fn populate_composite(
        &self,
        name: &str,
        rng: &mut dyn RngCore,
        composites: &mut Vec<String>,
    ) -> Result<StubValue, GeneratorError> {
        if composites.iter().any(|c| c == name) {
            trace!(composite = name, "composite nested in itself; leaving null");
            return Ok(StubValue::Null);
        }

        let (Some(definition), Some(mut value)) = (
            self.registry.composite(name),
            self.registry.instantiate_composite(name),
        ) else {
            return Ok(StubValue::Null);
        };

        composites.push(name.to_string());
        for property in &definition.properties {
            if value.is_set(&property.name) {
                continue;
            }
            let field = FieldDescriptor::new(property.name.clone(), property.representation.clone());
            let generated =
                self.representation_value(&field, &property.representation, rng, composites)?;
            value.set(property.name.clone(), generated);
        }
        composites.pop();

        Ok(StubValue::Object(value))
    }

    /// Expand the relations declared on `entity`, one level of the type
    /// `concrete` being built. A relation targeting `concrete` is skipped on
    /// every level, so an ancestor pointing at its own subtype terminates.
    #[allow(clippy::too_many_arguments)]
    fn populate_relations(
        &self,
        stub: &mut Stub,
        concrete: &str,
        entity: &str,
        visited: &mut Vec<String>,
        preset: &HashSet<String>,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(), GeneratorError> {
        let primary_fields = self.schema.primary_fields(entity);

        for relation in self.schema.relations_of(entity) {
            let Some(target) = relation.target.resolve() else {
                continue;
            };
            if target == entity
                || target == concrete
                || visited.contains(&target)
                || !self.registry.is_entity(&target)
                || stub.is_set(&relation.property)
            {
                continue;
            }

            let mut chain = visited.clone();
            chain.push(entity.to_string());
            if concrete != entity && !chain.iter().any(|v| v == concrete) {
                chain.push(concrete.to_string());
            }

            match relation.cardinality {
                Cardinality::ToOne => {
                    trace!(entity, relation = %relation.property, target = %target, "expanding to-one relation");

                    let origin = Origin {
                        entity,
                        primary_fields: &primary_fields,
                        stub: &*stub,
                    };
                    let related = self.build_related(&target, &chain, &origin, options, rng)?;

                    self.wire_join_fields(stub, preset, entity, relation, &target, &related);
                    stub.set(relation.property.clone(), related);
                }
                Cardinality::ToMany => {
                    let bounds = self.config.to_many;
                    let count = self
                        .generator
                        .generate_random_number(bounds.min as i64, bounds.max as i64, rng)
                        .max(0);
                    trace!(entity, relation = %relation.property, target = %target, count, "expanding to-many relation");

                    let origin = Origin {
                        entity,
                        primary_fields: &primary_fields,
                        stub: &*stub,
                    };
                    let mut items = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        let related = self.build_related(&target, &chain, &origin, options, rng)?;
                        items.push(StubValue::Object(related));
                    }

                    stub.set(relation.property.clone(), StubValue::Array(items));
                }
            }
        }

        visited.push(entity.to_string());
        Ok(())
    }

    /// Build one related stub. Each call gets its own copy of the chain, so
    /// siblings never see each other's expansions.
    fn build_related(
        &self,
        target: &str,
        chain: &[String],
        origin: &Origin<'_>,
        options: &StubOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Stub, GeneratorError> {
        let mut visited = chain.to_vec();
        let (mut related, preset) =
            self.instantiate_and_populate(target, &mut visited, options, rng)?;

        self.wire_back_references(&mut related, &preset, target, origin);
        Ok(related)
    }

    /// Copy the origin's primary key into the related stub's join fields for
    /// every relation (own or inherited) of `target` pointing back at the
    /// origin type.
    fn wire_back_references(
        &self,
        related: &mut Stub,
        preset: &HashSet<String>,
        target: &str,
        origin: &Origin<'_>,
    ) {
        let related_fields = self.schema.fields_with_ancestors(target);
        let mut levels = self.schema.ancestry(target);
        levels.reverse();
        levels.push(target);

        for level in levels {
            for relation in self.schema.relations_of(level) {
                if !relation.targets(origin.entity) {
                    continue;
                }
                let join_fields = self.schema.join_fields_of(level, &relation.property);
                for (position, join) in join_fields.iter().enumerate() {
                    let Some(local) = find_join_field(join, &related_fields) else {
                        continue;
                    };
                    if preset.contains(&local.property) {
                        continue;
                    }
                    let Some(value) = origin
                        .primary_fields
                        .get(position)
                        .and_then(|pk| origin.stub.get(&pk.property))
                    else {
                        continue;
                    };
                    related.set(local.property.clone(), value.clone());
                }
            }
        }
    }

    /// Copy the related stub's primary key into the owner's join fields.
    fn wire_join_fields(
        &self,
        stub: &mut Stub,
        preset: &HashSet<String>,
        entity: &str,
        relation: &RelationDescriptor,
        target: &str,
        related: &Stub,
    ) {
        let owner_fields = self.schema.fields_with_ancestors(entity);
        let related_primary = self.schema.primary_fields(target);
        let join_fields = self.schema.join_fields_of(entity, &relation.property);

        for (position, join) in join_fields.iter().enumerate() {
            let Some(local) = find_join_field(join, &owner_fields) else {
                continue;
            };
            if preset.contains(&local.property) {
                continue;
            }
            let Some(value) = related_primary
                .get(position)
                .and_then(|pk| related.get(&pk.property))
            else {
                continue;
            };
            stub.set(local.property.clone(), value.clone());
        }
    }
}

/// Field whose storage name matches the join field's lookup key.
fn find_join_field<'f>(
    join: &JoinFieldDescriptor,
    fields: &[&'f FieldDescriptor],
) -> Option<&'f FieldDescriptor> {
    fields
        .iter()
        .copied()
        .find(|field| field.storage_key() == join.lookup_key())
}
