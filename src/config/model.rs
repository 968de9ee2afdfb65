use serde::{Deserialize, Serialize};

use crate::error::{OntokitError, Result};

fn default_true() -> bool {
    true
}

/// How a product's artefact is kept up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maintenance {
    #[default]
    Manual,
    Automatic,
    Merged,
    Extract,
}

/// Extraction strategy for import modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    #[default]
    Slme,
    Minimal,
    Mirror,
    Custom,
    Filter,
}

/// Per-product resource budget for the external build tool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<u32>,
}

/// Fields shared by every product variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCommon {
    /// Stable short handle, unique within the owning group.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub maintenance: Maintenance,
    #[serde(default = "default_true")]
    pub rebuild_if_source_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_settings: Option<CommandSettings>,
}

impl ProductCommon {
    fn stub(id: &str) -> Self {
        ProductCommon {
            id: id.to_string(),
            description: None,
            maintenance: Maintenance::default(),
            rebuild_if_source_changes: true,
            robot_settings: None,
        }
    }
}

/// An upstream ontology slice brought in as an import module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<ModuleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_iris: Option<Vec<String>>,
    #[serde(default)]
    pub is_large: bool,
}

/// A named subset (slim) published alongside the main release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
}

/// A component file merged into the release; keyed by filename rather than id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentProduct {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub maintenance: Maintenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub use_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<String>>,
    #[serde(default)]
    pub use_mappings: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<Vec<String>>,
}

/// A DOSDP pattern pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPipelineProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default = "default_dosdp_options")]
    pub dosdp_tools_options: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology: Option<String>,
}

fn default_dosdp_options() -> String {
    "--obo-prefixes=true".to_string()
}

/// An SSSOM mapping set maintained with the ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SSSOMMappingSetProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default)]
    pub sssom_tool_options: String,
}

/// A Babelon translation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabelonTranslationProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub include_robot_template_synonyms: bool,
}

/// An additional exported artefact (reports, flat files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportProduct {
    #[serde(flatten)]
    pub common: ProductCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A product that can be declared as a bare handle and later stubbed out.
trait Stubbed {
    fn handle(&self) -> &str;
    fn stub(handle: &str) -> Self;
}

macro_rules! stubbed_by_id {
    ($($ty:ty),+) => {$(
        impl Stubbed for $ty {
            fn handle(&self) -> &str {
                &self.common.id
            }
            fn stub(handle: &str) -> Self {
                Self {
                    common: ProductCommon::stub(handle),
                    ..Default::default()
                }
            }
        }
    )+};
}

stubbed_by_id!(
    ImportProduct,
    SubsetProduct,
    PatternPipelineProduct,
    SSSOMMappingSetProduct,
    BabelonTranslationProduct,
    ExportProduct
);

impl Default for ImportProduct {
    fn default() -> Self {
        ImportProduct {
            common: ProductCommon::stub(""),
            mirror_from: None,
            module_type: None,
            base_iris: None,
            is_large: false,
        }
    }
}

impl Default for SubsetProduct {
    fn default() -> Self {
        SubsetProduct {
            common: ProductCommon::stub(""),
            creators: None,
        }
    }
}

impl Default for PatternPipelineProduct {
    fn default() -> Self {
        PatternPipelineProduct {
            common: ProductCommon::stub(""),
            dosdp_tools_options: default_dosdp_options(),
            ontology: None,
        }
    }
}

impl Default for SSSOMMappingSetProduct {
    fn default() -> Self {
        SSSOMMappingSetProduct {
            common: ProductCommon::stub(""),
            mirror_from: None,
            source_file: None,
            sssom_tool_options: String::new(),
        }
    }
}

impl Default for BabelonTranslationProduct {
    fn default() -> Self {
        BabelonTranslationProduct {
            common: ProductCommon::stub(""),
            language: None,
            include_robot_template_synonyms: false,
        }
    }
}

impl Default for ExportProduct {
    fn default() -> Self {
        ExportProduct {
            common: ProductCommon::stub(""),
            format: None,
        }
    }
}

impl Stubbed for ComponentProduct {
    fn handle(&self) -> &str {
        &self.filename
    }
    fn stub(handle: &str) -> Self {
        ComponentProduct {
            filename: handle.to_string(),
            description: None,
            maintenance: Maintenance::default(),
            source: None,
            use_template: false,
            templates: None,
            use_mappings: false,
            mappings: None,
        }
    }
}

/// Merge shorthand handles and explicit products into one list: explicit
/// products keep their position, handles without a matching product are
/// appended as stubs in declaration order.
fn reconcile<P: Stubbed>(ids: &Option<Vec<String>>, products: &mut Option<Vec<P>>) {
    let products = products.get_or_insert_with(Vec::new);
    if let Some(ids) = ids {
        for id in ids {
            if !products.iter().any(|p| p.handle() == id) {
                products.push(P::stub(id));
            }
        }
    }
}

fn check_unique<P: Stubbed>(group: &str, products: &Option<Vec<P>>) -> Result<()> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products.iter().flatten() {
        let handle = product.handle();
        if handle.is_empty() {
            return Err(OntokitError::ConfigValidation {
                message: format!("{group} contains a product with an empty handle"),
            });
        }
        if seen.contains(&handle) {
            return Err(OntokitError::ConfigValidation {
                message: format!("{group} declares {handle:?} more than once"),
            });
        }
        seen.push(handle);
    }
    Ok(())
}

/// Fields shared by every product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCommon {
    /// Shorthand product declarations, reconciled into `products`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub rebuild_if_source_changes: bool,
}

impl Default for GroupCommon {
    fn default() -> Self {
        GroupCommon {
            ids: None,
            disabled: false,
            rebuild_if_source_changes: true,
        }
    }
}

macro_rules! group_products {
    ($ty:ty, $product:ty) => {
        impl $ty {
            /// Member products, empty when the group is disabled or unset.
            pub fn products(&self) -> &[$product] {
                if self.group.disabled {
                    return &[];
                }
                self.products.as_deref().unwrap_or(&[])
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "ImportGroup::default_directory")]
    pub directory: String,
    #[serde(default)]
    pub module_type: ModuleType,
    #[serde(default = "ImportGroup::default_annotation_properties")]
    pub annotation_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ImportProduct>>,
}

impl ImportGroup {
    fn default_directory() -> String {
        "imports".to_string()
    }

    fn default_annotation_properties() -> Vec<String> {
        vec!["rdfs:label".to_string(), "IAO:0000115".to_string()]
    }

    fn fill_missing(&mut self, uribase: &str) {
        reconcile(&self.group.ids, &mut self.products);
        for product in self.products.iter_mut().flatten() {
            if product.module_type.is_none() {
                product.module_type = Some(self.module_type);
            }
            if product.base_iris.is_none() {
                product.base_iris = Some(vec![format!(
                    "{}/{}_",
                    uribase,
                    product.common.id.to_uppercase()
                )]);
            }
            if product.mirror_from.is_none() {
                product.mirror_from = Some(format!("{}/{}.owl", uribase, product.common.id));
            }
        }
    }
}

impl Default for ImportGroup {
    fn default() -> Self {
        ImportGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            module_type: ModuleType::default(),
            annotation_properties: Self::default_annotation_properties(),
            products: None,
        }
    }
}

group_products!(ImportGroup, ImportProduct);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "SubsetGroup::default_directory")]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<SubsetProduct>>,
}

impl SubsetGroup {
    fn default_directory() -> String {
        "subsets".to_string()
    }

    fn fill_missing(&mut self, creators: Option<&Vec<String>>) {
        reconcile(&self.group.ids, &mut self.products);
        for product in self.products.iter_mut().flatten() {
            if product.creators.is_none() {
                product.creators = creators.cloned();
            }
        }
    }
}

impl Default for SubsetGroup {
    fn default() -> Self {
        SubsetGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            products: None,
        }
    }
}

group_products!(SubsetGroup, SubsetProduct);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentGroup {
    /// Shorthand filename declarations, reconciled into `products`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filenames: Option<Vec<String>>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "ComponentGroup::default_directory")]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ComponentProduct>>,
}

impl ComponentGroup {
    fn default_directory() -> String {
        "components".to_string()
    }

    fn fill_missing(&mut self) {
        reconcile(&self.filenames, &mut self.products);
    }

    /// Member products, empty when the group is disabled or unset.
    pub fn products(&self) -> &[ComponentProduct] {
        if self.disabled {
            return &[];
        }
        self.products.as_deref().unwrap_or(&[])
    }
}

impl Default for ComponentGroup {
    fn default() -> Self {
        ComponentGroup {
            filenames: None,
            disabled: false,
            directory: Self::default_directory(),
            products: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPipelineGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "PatternPipelineGroup::default_directory")]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<PatternPipelineProduct>>,
}

impl PatternPipelineGroup {
    fn default_directory() -> String {
        "patterns".to_string()
    }

    fn fill_missing(&mut self) {
        reconcile(&self.group.ids, &mut self.products);
    }
}

impl Default for PatternPipelineGroup {
    fn default() -> Self {
        PatternPipelineGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            products: None,
        }
    }
}

group_products!(PatternPipelineGroup, PatternPipelineProduct);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SSSOMMappingSetGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "SSSOMMappingSetGroup::default_directory")]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<SSSOMMappingSetProduct>>,
}

impl SSSOMMappingSetGroup {
    fn default_directory() -> String {
        "mappings".to_string()
    }

    fn fill_missing(&mut self) {
        reconcile(&self.group.ids, &mut self.products);
    }
}

impl Default for SSSOMMappingSetGroup {
    fn default() -> Self {
        SSSOMMappingSetGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            products: None,
        }
    }
}

group_products!(SSSOMMappingSetGroup, SSSOMMappingSetProduct);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabelonTranslationSetGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "BabelonTranslationSetGroup::default_directory")]
    pub directory: String,
    #[serde(default = "BabelonTranslationSetGroup::default_language")]
    pub default_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<BabelonTranslationProduct>>,
}

impl BabelonTranslationSetGroup {
    fn default_directory() -> String {
        "translations".to_string()
    }

    fn default_language() -> String {
        "en".to_string()
    }

    fn fill_missing(&mut self) {
        reconcile(&self.group.ids, &mut self.products);
        for product in self.products.iter_mut().flatten() {
            if product.language.is_none() {
                product.language = Some(self.default_language.clone());
            }
        }
    }
}

impl Default for BabelonTranslationSetGroup {
    fn default() -> Self {
        BabelonTranslationSetGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            default_language: Self::default_language(),
            products: None,
        }
    }
}

group_products!(BabelonTranslationSetGroup, BabelonTranslationProduct);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportGroup {
    #[serde(flatten)]
    pub group: GroupCommon,
    #[serde(default = "ExportGroup::default_directory")]
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ExportProduct>>,
}

impl ExportGroup {
    fn default_directory() -> String {
        "reports".to_string()
    }

    fn fill_missing(&mut self) {
        reconcile(&self.group.ids, &mut self.products);
    }
}

impl Default for ExportGroup {
    fn default() -> Self {
        ExportGroup {
            group: GroupCommon::default(),
            directory: Self::default_directory(),
            products: None,
        }
    }
}

group_products!(ExportGroup, ExportProduct);

/// Settings for the generated documentation site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationConfig {
    #[serde(default = "DocumentationConfig::default_system")]
    pub documentation_system: String,
}

impl DocumentationConfig {
    fn default_system() -> String {
        "mkdocs".to_string()
    }
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        DocumentationConfig {
            documentation_system: Self::default_system(),
        }
    }
}

/// The root configuration for an ontology project repository.
///
/// Project-wide scalar settings plus zero-or-one of each product group.
/// Constructed once per invocation, mutated in place by [`fill_missing`]
/// during loading, then treated as immutable input to rendering.
///
/// [`fill_missing`]: OntologyProject::fill_missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OntologyProject {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub repo: String,
    pub github_org: String,
    pub git_main_branch: String,
    pub edit_format: String,
    pub reasoner: String,
    pub primary_release: String,
    pub release_artefacts: Vec<String>,
    pub export_formats: Vec<String>,
    pub license: String,
    pub uribase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uribase_suffix: Option<String>,
    pub use_dosdps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obo_format_options: Option<String>,
    pub ci: Vec<String>,
    pub workflows: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<DocumentationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_group: Option<ImportGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset_group: Option<SubsetGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_pipelines_group: Option<PatternPipelineGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sssom_mappingset_group: Option<SSSOMMappingSetGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub babelon_translation_group: Option<BabelonTranslationSetGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_group: Option<ExportGroup>,
}

impl Default for OntologyProject {
    fn default() -> Self {
        OntologyProject {
            id: String::new(),
            title: String::new(),
            description: None,
            repo: String::new(),
            github_org: String::new(),
            git_main_branch: "main".to_string(),
            edit_format: "owl".to_string(),
            reasoner: "ELK".to_string(),
            primary_release: "full".to_string(),
            release_artefacts: vec!["full".to_string(), "base".to_string()],
            export_formats: vec!["owl".to_string(), "obo".to_string()],
            license: "https://creativecommons.org/licenses/unlicense/1.0/".to_string(),
            uribase: "http://purl.obolibrary.org/obo".to_string(),
            uribase_suffix: None,
            use_dosdps: false,
            robot_version: None,
            obo_format_options: None,
            ci: vec!["github_actions".to_string()],
            workflows: vec!["docs".to_string()],
            documentation: None,
            contact: None,
            creators: None,
            contributors: None,
            import_group: None,
            subset_group: None,
            components: None,
            pattern_pipelines_group: None,
            sssom_mappingset_group: None,
            babelon_translation_group: None,
            export_group: None,
        }
    }
}

impl OntologyProject {
    /// Reconcile shorthand declarations with explicit products and push
    /// group defaults down into members that did not set them.
    ///
    /// Run exactly once per load, after caller overrides.
    pub fn fill_missing(&mut self) {
        let uribase = self.uribase.clone();
        let creators = self.creators.clone();
        if let Some(group) = &mut self.import_group {
            group.fill_missing(&uribase);
        }
        if let Some(group) = &mut self.subset_group {
            group.fill_missing(creators.as_ref());
        }
        if let Some(group) = &mut self.components {
            group.fill_missing();
        }
        if let Some(group) = &mut self.pattern_pipelines_group {
            group.fill_missing();
        }
        if let Some(group) = &mut self.sssom_mappingset_group {
            group.fill_missing();
        }
        if let Some(group) = &mut self.babelon_translation_group {
            group.fill_missing();
        }
        if let Some(group) = &mut self.export_group {
            group.fill_missing();
        }
    }

    /// Structural checks that only make sense after `fill_missing`.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(OntokitError::ConfigValidation {
                message: "project id is empty (set `id` or pass a repository name)".to_string(),
            });
        }
        if let Some(group) = &self.import_group {
            check_unique("import_group", &group.products)?;
        }
        if let Some(group) = &self.subset_group {
            check_unique("subset_group", &group.products)?;
        }
        if let Some(group) = &self.components {
            check_unique("components", &group.products)?;
        }
        if let Some(group) = &self.pattern_pipelines_group {
            check_unique("pattern_pipelines_group", &group.products)?;
        }
        if let Some(group) = &self.sssom_mappingset_group {
            check_unique("sssom_mappingset_group", &group.products)?;
        }
        if let Some(group) = &self.babelon_translation_group {
            check_unique("babelon_translation_group", &group.products)?;
        }
        if let Some(group) = &self.export_group {
            check_unique("export_group", &group.products)?;
        }
        Ok(())
    }
}

/// The single root object handed to the template renderer.
///
/// Exactly one live instance per generation run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub project: OntologyProject,
    /// SHA-256 of the canonicalized source document, when one was loaded.
    pub config_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reconciliation_keeps_custom_products_and_order() {
        let mut group = ImportGroup {
            group: GroupCommon {
                ids: Some(vec!["a".to_string(), "b".to_string()]),
                ..Default::default()
            },
            products: Some(vec![ImportProduct {
                common: ProductCommon {
                    description: Some("custom".to_string()),
                    ..ProductCommon::stub("a")
                },
                is_large: true,
                ..Default::default()
            }]),
            ..Default::default()
        };

        group.fill_missing("http://purl.obolibrary.org/obo");

        let products = group.products.as_ref().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].common.id, "a");
        assert_eq!(products[0].common.description.as_deref(), Some("custom"));
        assert!(products[0].is_large);
        assert_eq!(products[1].common.id, "b");
        assert!(!products[1].is_large);
    }

    #[test]
    fn import_defaults_derive_from_group_and_uribase() {
        let mut project = OntologyProject {
            id: "foo".to_string(),
            import_group: Some(ImportGroup {
                group: GroupCommon {
                    ids: Some(vec!["uberon".to_string()]),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };

        project.fill_missing();

        let group = project.import_group.as_ref().unwrap();
        let product = &group.products()[0];
        assert_eq!(product.common.id, "uberon");
        assert_eq!(product.module_type, Some(ModuleType::Slme));
        assert_eq!(
            product.base_iris.as_ref().unwrap(),
            &vec!["http://purl.obolibrary.org/obo/UBERON_".to_string()]
        );
        assert_eq!(
            product.mirror_from.as_deref(),
            Some("http://purl.obolibrary.org/obo/uberon.owl")
        );
    }

    #[test]
    fn explicit_module_type_is_not_overwritten() {
        let mut group = ImportGroup {
            group: GroupCommon::default(),
            products: Some(vec![ImportProduct {
                common: ProductCommon::stub("pato"),
                module_type: Some(ModuleType::Mirror),
                ..Default::default()
            }]),
            ..Default::default()
        };

        group.fill_missing("http://purl.obolibrary.org/obo");
        assert_eq!(
            group.products()[0].module_type,
            Some(ModuleType::Mirror)
        );
    }

    #[test]
    fn subset_creators_default_from_project() {
        let mut project = OntologyProject {
            id: "foo".to_string(),
            creators: Some(vec!["https://orcid.org/0000-0000-0000-0001".to_string()]),
            subset_group: Some(SubsetGroup {
                group: GroupCommon {
                    ids: Some(vec!["foo_slim".to_string()]),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };

        project.fill_missing();

        let subset = &project.subset_group.as_ref().unwrap().products()[0];
        assert_eq!(
            subset.creators.as_ref().unwrap()[0],
            "https://orcid.org/0000-0000-0000-0001"
        );
    }

    #[test]
    fn babelon_language_defaults_from_group() {
        let mut group = BabelonTranslationSetGroup {
            group: GroupCommon {
                ids: Some(vec!["fr".to_string()]),
                ..Default::default()
            },
            default_language: "fr".to_string(),
            ..Default::default()
        };
        group.fill_missing();
        assert_eq!(group.products()[0].language.as_deref(), Some("fr"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let project = OntologyProject {
            id: "foo".to_string(),
            import_group: Some(ImportGroup {
                products: Some(vec![
                    ImportProduct::stub("ro"),
                    ImportProduct::stub("ro"),
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let err = project.validate().unwrap_err();
        assert!(matches!(err, OntokitError::ConfigValidation { .. }));
    }

    #[test]
    fn empty_project_id_rejected() {
        let project = OntologyProject::default();
        assert!(project.validate().is_err());
    }

    #[test]
    fn disabled_group_exposes_no_products() {
        let group = ImportGroup {
            group: GroupCommon {
                disabled: true,
                ..Default::default()
            },
            products: Some(vec![ImportProduct::stub("ro")]),
            ..Default::default()
        };
        assert!(group.products().is_empty());
    }
}
