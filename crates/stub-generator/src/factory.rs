//! Stub factory: the public entry point for creating stubs.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use stub_core::{EntitySchema, SchemaIntrospector, Stub, SynthesisConfig, TypeRegistry};
use tracing::debug;

use crate::generator::{Generator, GeneratorError, GeneratorOverrides, ValueGenerator};
use crate::options::StubOptions;
use crate::synthesizer::GraphSynthesizer;

enum GeneratorSource {
    Default(Generator),
    Custom(Arc<dyn ValueGenerator>),
}

/// Creates populated stubs for registered entity types.
///
/// The factory is immutable once built and can be shared across threads;
/// every call owns its own RNG and expansion state.
pub struct StubFactory<S: SchemaIntrospector> {
    schema: S,
    registry: TypeRegistry,
    generator: GeneratorSource,
    config: SynthesisConfig,
}

impl<S: SchemaIntrospector> StubFactory<S> {
    /// Create a factory with the default generator and synthesis settings.
    pub fn new(schema: S, registry: TypeRegistry) -> Self {
        Self {
            schema,
            registry,
            generator: GeneratorSource::Default(Generator::default()),
            config: SynthesisConfig::default(),
        }
    }

    /// Replace individual generator routines.
    pub fn with_overrides(mut self, overrides: GeneratorOverrides) -> Self {
        self.generator = GeneratorSource::Default(
            Generator::new(overrides).with_array_length(self.config.array_length),
        );
        self
    }

    /// Use a custom value generator.
    ///
    /// A custom generator decides its own array lengths.
    pub fn with_value_generator<G>(mut self, generator: G) -> Self
    where
        G: ValueGenerator + 'static,
    {
        self.generator = GeneratorSource::Custom(Arc::new(generator));
        self
    }

    /// Replace the synthesis settings.
    pub fn with_config(self, config: SynthesisConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(self.apply_config(config))
    }

    fn apply_config(mut self, config: SynthesisConfig) -> Self {
        if let GeneratorSource::Default(generator) = &mut self.generator {
            *generator = generator.clone().with_array_length(config.array_length);
        }
        self.config = config;
        self
    }

    /// Get a reference to the schema.
    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for adding factories and producers.
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    fn generator(&self) -> &dyn ValueGenerator {
        match &self.generator {
            GeneratorSource::Default(generator) => generator,
            GeneratorSource::Custom(generator) => generator.as_ref(),
        }
    }

    fn synthesizer(&self) -> GraphSynthesizer<'_> {
        GraphSynthesizer::new(&self.schema, &self.registry, self.generator(), self.config)
    }

    fn ensure_registered(&self, entity: &str) -> Result<(), GeneratorError> {
        if !self.registry.is_entity(entity) {
            return Err(GeneratorError::EntityNotFound(entity.to_string()));
        }
        Ok(())
    }

    /// Create one populated stub of `entity`.
    pub fn create_one(&self, entity: &str, options: &StubOptions) -> Result<Stub, GeneratorError> {
        self.ensure_registered(entity)?;
        debug!(entity, deep = options.deep, seed = ?options.seed, "Creating stub");

        let mut rng = rng_for_index(options.seed, 0);
        self.synthesizer().synthesize(entity, options, &mut rng)
    }

    /// Create `count` independent stubs of `entity`.
    ///
    /// Without a count, a random number within the array-length bounds is
    /// created. With a seed, instance `i` is derived from the seed and `i`,
    /// so the first instance matches [`StubFactory::create_one`].
    pub fn create_many(
        &self,
        entity: &str,
        count: Option<usize>,
        options: &StubOptions,
    ) -> Result<Vec<Stub>, GeneratorError> {
        self.ensure_registered(entity)?;

        let count = match count {
            Some(count) => count,
            None => {
                let bounds = self.config.array_length;
                let mut rng = rng_for_index(options.seed, u64::MAX);
                self.generator()
                    .generate_random_number(bounds.min as i64, bounds.max as i64, &mut rng)
                    .max(0) as usize
            }
        };
        debug!(entity, count, deep = options.deep, seed = ?options.seed, "Creating stubs");

        let synthesizer = self.synthesizer();
        (0..count as u64)
            .map(|index| {
                let mut rng = rng_for_index(options.seed, index);
                synthesizer.synthesize(entity, options, &mut rng)
            })
            .collect()
    }
}

impl StubFactory<EntitySchema> {
    /// Factory over a YAML schema, with every declared entity and composite
    /// registered and the schema's synthesis settings applied.
    pub fn from_schema(schema: EntitySchema) -> Self {
        let registry = schema.type_registry();
        let config = schema.synthesis;
        Self::new(schema, registry).apply_config(config)
    }
}

impl<S: SchemaIntrospector + fmt::Debug> fmt::Debug for StubFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubFactory")
            .field("schema", &self.schema)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// RNG for the instance at `index`.
///
/// Seeded runs combine the base seed with the index so any instance can be
/// reproduced on its own.
fn rng_for_index(seed: Option<u64>, index: u64) -> StdRng {
    match seed {
        Some(base_seed) => {
            StdRng::seed_from_u64(base_seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15)))
        }
        None => StdRng::from_os_rng(),
    }
}
