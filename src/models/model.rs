//! Compiled, validated classifier.
//!
//! Scoring relies on two primitive operations:
//! - encode a `FeatureRecord` into the artifact's column order
//! - compute a raw margin from the encoded row
//!
//! `Model::from_artifact` checks the artifact's internal structure once, so
//! that evaluation can index nodes and weights without further checks.

use std::collections::HashSet;

use crate::domain::{Column, FeatureRecord, FeatureValue, Label, Prediction, Probabilities};
use crate::models::artifact::{
    ARTIFACT_FORMAT, ARTIFACT_VERSION, FeatureWeight, GbdtSpec, LogisticSpec, ModelArtifact, NodeSpec,
    ScorerSpec,
};
use crate::models::error::ModelError;

/// One encoded input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoded {
    Numeric(f64),
    /// Index into the column's trained vocabulary.
    Category(usize),
}

impl Encoded {
    fn as_f64(self) -> f64 {
        match self {
            Encoded::Numeric(v) => v,
            Encoded::Category(i) => i as f64,
        }
    }
}

/// How one artifact column binds to the feature record.
#[derive(Debug, Clone)]
struct InputBinding {
    name: String,
    column: Option<Column>,
    vocabulary: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
enum Scorer {
    Gbdt { base_score: f64, trees: Vec<Vec<NodeSpec>> },
    Logistic { intercept: f64, weights: Vec<FeatureWeight> },
}

#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    inputs: Vec<InputBinding>,
    threshold: f64,
    scorer: Scorer,
}

impl Model {
    /// Validate the artifact structure and compile it.
    ///
    /// Errors are human-readable reasons; the gateway wraps them as corrupt-artifact
    /// load errors. Column names the record does not know are accepted here and
    /// reported as schema mismatches at prediction time.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, String> {
        if artifact.format != ARTIFACT_FORMAT {
            return Err(format!(
                "unexpected format '{}' (expected '{ARTIFACT_FORMAT}')",
                artifact.format
            ));
        }
        if artifact.version != ARTIFACT_VERSION {
            return Err(format!(
                "unsupported version {} (expected {ARTIFACT_VERSION})",
                artifact.version
            ));
        }
        if !(artifact.threshold.is_finite() && artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(format!("threshold {} must lie in (0, 1)", artifact.threshold));
        }
        if artifact.features.is_empty() {
            return Err("feature list is empty".to_string());
        }

        let mut seen = HashSet::new();
        for name in &artifact.features {
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature '{name}'"));
            }
        }
        for (name, vocab) in &artifact.categories {
            if !seen.contains(name.as_str()) {
                return Err(format!("vocabulary given for unlisted feature '{name}'"));
            }
            if vocab.is_empty() {
                return Err(format!("empty vocabulary for '{name}'"));
            }
            let unique: HashSet<&str> = vocab.iter().map(String::as_str).collect();
            if unique.len() != vocab.len() {
                return Err(format!("duplicate category in vocabulary for '{name}'"));
            }
        }

        let inputs: Vec<InputBinding> = artifact
            .features
            .iter()
            .map(|name| InputBinding {
                name: name.clone(),
                column: Column::from_name(name),
                vocabulary: artifact.categories.get(name).cloned(),
            })
            .collect();

        let scorer = match artifact.model {
            ScorerSpec::Gbdt(spec) => compile_gbdt(spec, &inputs)?,
            ScorerSpec::Logistic(spec) => compile_logistic(spec, &inputs)?,
        };

        Ok(Self {
            name: artifact.name,
            inputs,
            threshold: artifact.threshold,
            scorer,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind_name(&self) -> &'static str {
        match self.scorer {
            Scorer::Gbdt { .. } => "gbdt",
            Scorer::Logistic { .. } => "logistic",
        }
    }

    /// Number of trees (0 for linear models).
    pub fn tree_count(&self) -> usize {
        match &self.scorer {
            Scorer::Gbdt { trees, .. } => trees.len(),
            Scorer::Logistic { .. } => 0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Column names in the order the model consumes them.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|b| b.name.as_str())
    }

    /// Structural schema check that does not depend on record values.
    pub fn check_schema(&self) -> Result<(), ModelError> {
        for column in Column::ALL {
            if !self.inputs.iter().any(|b| b.column == Some(column)) {
                return Err(ModelError::MissingFeature(column));
            }
        }
        for binding in &self.inputs {
            let Some(column) = binding.column else {
                return Err(ModelError::UnknownFeature(binding.name.clone()));
            };
            if column.is_categorical() != binding.vocabulary.is_some() {
                return Err(ModelError::TypeMismatch(column));
            }
        }
        Ok(())
    }

    /// Encode a record in the artifact's column order.
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<Encoded>, ModelError> {
        self.check_schema()?;
        let mut row = Vec::with_capacity(self.inputs.len());
        for binding in &self.inputs {
            let Some(column) = binding.column else {
                return Err(ModelError::UnknownFeature(binding.name.clone()));
            };
            let encoded = match (record.value(column), &binding.vocabulary) {
                (FeatureValue::Numeric(v), None) => Encoded::Numeric(v),
                (FeatureValue::Categorical(value), Some(vocab)) => {
                    let idx = vocab.iter().position(|c| c == value).ok_or_else(|| {
                        ModelError::UnseenCategory {
                            column,
                            value: value.to_string(),
                        }
                    })?;
                    Encoded::Category(idx)
                }
                _ => return Err(ModelError::TypeMismatch(column)),
            };
            row.push(encoded);
        }
        Ok(row)
    }

    /// Raw score for an encoded row (before the logistic link).
    pub fn margin(&self, row: &[Encoded]) -> f64 {
        match &self.scorer {
            Scorer::Gbdt { base_score, trees } => {
                base_score + trees.iter().map(|nodes| eval_tree(nodes, row)).sum::<f64>()
            }
            Scorer::Logistic { intercept, weights } => {
                let mut z = *intercept;
                for (w, x) in weights.iter().zip(row) {
                    z += match (w, x) {
                        (FeatureWeight::Scalar(w), x) => w * x.as_f64(),
                        (FeatureWeight::OneHot(ws), Encoded::Category(i)) => ws[*i],
                        (FeatureWeight::OneHot(_), Encoded::Numeric(_)) => 0.0,
                    };
                }
                z
            }
        }
    }

    /// Score one record.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, ModelError> {
        let row = self.encode(record)?;
        let margin = self.margin(&row);
        if !margin.is_finite() {
            return Err(ModelError::NonFiniteOutput);
        }
        let p_yes = sigmoid(margin);
        // A tie goes to the negative class.
        let label = if p_yes > self.threshold { Label::Yes } else { Label::No };
        tracing::debug!(margin, p_yes, "scored record");
        Ok(Prediction {
            label,
            probabilities: Probabilities::from_positive(p_yes),
            margin,
        })
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn eval_tree(nodes: &[NodeSpec], row: &[Encoded]) -> f64 {
    let mut idx = 0;
    loop {
        match &nodes[idx] {
            NodeSpec::Leaf(value) => return *value,
            NodeSpec::Numeric {
                feature,
                threshold,
                left,
                right,
            } => {
                idx = if row[*feature].as_f64() <= *threshold { *left } else { *right };
            }
            NodeSpec::Categorical {
                feature,
                left_categories,
                left,
                right,
            } => {
                idx = match row[*feature] {
                    Encoded::Category(c) if left_categories.contains(&c) => *left,
                    _ => *right,
                };
            }
        }
    }
}

fn compile_gbdt(spec: GbdtSpec, inputs: &[InputBinding]) -> Result<Scorer, String> {
    if !spec.base_score.is_finite() {
        return Err("base_score must be finite".to_string());
    }
    if spec.trees.is_empty() {
        return Err("tree ensemble is empty".to_string());
    }

    let mut trees = Vec::with_capacity(spec.trees.len());
    for (t, tree) in spec.trees.into_iter().enumerate() {
        let nodes = tree.nodes;
        if nodes.is_empty() {
            return Err(format!("tree {t} has no nodes"));
        }
        for (i, node) in nodes.iter().enumerate() {
            check_node(node, i, nodes.len(), inputs).map_err(|e| format!("tree {t}, node {i}: {e}"))?;
        }
        if let Some(i) = first_unreachable(&nodes) {
            return Err(format!("tree {t}, node {i}: not reachable from the root"));
        }
        trees.push(nodes);
    }

    Ok(Scorer::Gbdt {
        base_score: spec.base_score,
        trees,
    })
}

/// Index of the first node no path from node 0 leads to. Assumes children
/// point forward, so one pass in index order is enough.
fn first_unreachable(nodes: &[NodeSpec]) -> Option<usize> {
    let mut reached = vec![false; nodes.len()];
    reached[0] = true;
    for (i, node) in nodes.iter().enumerate() {
        if !reached[i] {
            return Some(i);
        }
        match node {
            NodeSpec::Numeric { left, right, .. } | NodeSpec::Categorical { left, right, .. } => {
                reached[*left] = true;
                reached[*right] = true;
            }
            NodeSpec::Leaf(_) => {}
        }
    }
    None
}

// Children must point forward, which rules out cycles.
fn check_node(node: &NodeSpec, index: usize, len: usize, inputs: &[InputBinding]) -> Result<(), String> {
    let (feature, left, right) = match node {
        NodeSpec::Leaf(value) => {
            return if value.is_finite() {
                Ok(())
            } else {
                Err("leaf value must be finite".to_string())
            };
        }
        NodeSpec::Numeric {
            feature,
            threshold,
            left,
            right,
        } => {
            if threshold.is_nan() {
                return Err("threshold is NaN".to_string());
            }
            (*feature, *left, *right)
        }
        NodeSpec::Categorical {
            feature, left, right, ..
        } => (*feature, *left, *right),
    };

    let binding = inputs
        .get(feature)
        .ok_or_else(|| format!("feature index {feature} out of range"))?;
    for child in [left, right] {
        if child <= index || child >= len {
            return Err(format!("child index {child} is invalid"));
        }
    }

    match (node, &binding.vocabulary) {
        (NodeSpec::Numeric { .. }, Some(_)) => {
            Err(format!("numeric split on categorical feature '{}'", binding.name))
        }
        (NodeSpec::Categorical { .. }, None) => {
            Err(format!("categorical split on numeric feature '{}'", binding.name))
        }
        (NodeSpec::Categorical { left_categories, .. }, Some(vocab)) => {
            match left_categories.iter().find(|&&c| c >= vocab.len()) {
                Some(c) => Err(format!("category index {c} out of range for '{}'", binding.name)),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn compile_logistic(spec: LogisticSpec, inputs: &[InputBinding]) -> Result<Scorer, String> {
    if !spec.intercept.is_finite() {
        return Err("intercept must be finite".to_string());
    }
    if spec.weights.len() != inputs.len() {
        return Err(format!(
            "{} weights for {} features",
            spec.weights.len(),
            inputs.len()
        ));
    }
    for (weight, binding) in spec.weights.iter().zip(inputs) {
        match (weight, &binding.vocabulary) {
            (FeatureWeight::Scalar(w), None) if w.is_finite() => {}
            (FeatureWeight::OneHot(ws), Some(vocab))
                if ws.len() == vocab.len() && ws.iter().all(|w| w.is_finite()) => {}
            _ => return Err(format!("invalid weight for feature '{}'", binding.name)),
        }
    }
    Ok(Scorer::Logistic {
        intercept: spec.intercept,
        weights: spec.weights,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{Category, FeatureBounds, FeatureFields, Job, Month, YesNo};
    use crate::models::artifact::TreeSpec;

    pub(crate) fn schema_features() -> Vec<String> {
        Column::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    pub(crate) fn full_categories() -> BTreeMap<String, Vec<String>> {
        fn names<C: Category>() -> Vec<String> {
            C::ALL.iter().map(|c| c.as_str().to_string()).collect()
        }
        let mut m = BTreeMap::new();
        m.insert("job".to_string(), names::<Job>());
        m.insert("housing".to_string(), names::<YesNo>());
        m.insert("loan".to_string(), names::<YesNo>());
        m.insert("contact".to_string(), names::<crate::domain::Contact>());
        m.insert("month".to_string(), names::<Month>());
        m
    }

    /// Two stumps: pdays > 30 pushes up, housing loan pushes down.
    pub(crate) fn stump_artifact() -> ModelArtifact {
        ModelArtifact {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            name: "test gbdt".to_string(),
            features: schema_features(),
            categories: full_categories(),
            threshold: 0.5,
            model: ScorerSpec::Gbdt(GbdtSpec {
                base_score: 0.0,
                trees: vec![
                    TreeSpec {
                        nodes: vec![
                            NodeSpec::Numeric {
                                feature: 8,
                                threshold: 30.0,
                                left: 1,
                                right: 2,
                            },
                            NodeSpec::Leaf(-1.0),
                            NodeSpec::Leaf(1.0),
                        ],
                    },
                    TreeSpec {
                        nodes: vec![
                            NodeSpec::Categorical {
                                feature: 2,
                                left_categories: vec![1],
                                left: 1,
                                right: 2,
                            },
                            NodeSpec::Leaf(-0.5),
                            NodeSpec::Leaf(0.25),
                        ],
                    },
                ],
            }),
        }
    }

    fn record(fields: FeatureFields) -> FeatureRecord {
        FeatureRecord::new(fields, &FeatureBounds::default()).unwrap()
    }

    #[test]
    fn gbdt_sums_leaves() {
        let model = Model::from_artifact(stump_artifact()).unwrap();
        let p = model.predict(&record(FeatureFields::default())).unwrap();
        // pdays 48 -> +1.0, housing no -> +0.25
        assert!((p.margin - 1.25).abs() < 1e-12);
        assert_eq!(p.label, Label::Yes);
        assert!((p.probabilities.p_yes - sigmoid(1.25)).abs() < 1e-12);

        let p = model
            .predict(&record(FeatureFields {
                pdays: -1,
                housing: YesNo::Yes,
                ..FeatureFields::default()
            }))
            .unwrap();
        assert!((p.margin + 1.5).abs() < 1e-12);
        assert_eq!(p.label, Label::No);
    }

    #[test]
    fn probabilities_always_sum_to_one() {
        let model = Model::from_artifact(stump_artifact()).unwrap();
        for pdays in [-1, 0, 30, 31, 450] {
            for housing in YesNo::ALL {
                let p = model
                    .predict(&record(FeatureFields {
                        pdays,
                        housing: *housing,
                        ..FeatureFields::default()
                    }))
                    .unwrap();
                let sum = p.probabilities.p_no + p.probabilities.p_yes;
                assert!((sum - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn logistic_uses_one_hot_weights() {
        let mut weights = Vec::new();
        for column in Column::ALL {
            let w = match column {
                Column::Age => FeatureWeight::Scalar(0.01),
                Column::Job => FeatureWeight::OneHot(vec![0.0; Job::ALL.len()]),
                Column::Month => FeatureWeight::OneHot(vec![0.3; Month::ALL.len()]),
                Column::Housing | Column::Loan | Column::Contact => FeatureWeight::OneHot(vec![0.0, 0.0]),
                _ => FeatureWeight::Scalar(0.0),
            };
            weights.push(w);
        }
        let artifact = ModelArtifact {
            model: ScorerSpec::Logistic(LogisticSpec {
                intercept: -1.0,
                weights,
            }),
            ..stump_artifact()
        };
        let model = Model::from_artifact(artifact).unwrap();
        assert_eq!(model.kind_name(), "logistic");
        assert_eq!(model.tree_count(), 0);
        let p = model.predict(&record(FeatureFields::default())).unwrap();
        assert!((p.margin - (-1.0 + 0.41 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn rejects_backward_child_pointer() {
        let mut artifact = stump_artifact();
        if let ScorerSpec::Gbdt(spec) = &mut artifact.model {
            spec.trees[0].nodes[0] = NodeSpec::Numeric {
                feature: 8,
                threshold: 30.0,
                left: 0,
                right: 2,
            };
        }
        let err = Model::from_artifact(artifact).unwrap_err();
        assert!(err.contains("tree 0, node 0"));
    }

    #[test]
    fn rejects_split_type_mismatch() {
        let mut artifact = stump_artifact();
        if let ScorerSpec::Gbdt(spec) = &mut artifact.model {
            spec.trees[0].nodes[0] = NodeSpec::Numeric {
                feature: 1,
                threshold: 3.0,
                left: 1,
                right: 2,
            };
        }
        let err = Model::from_artifact(artifact).unwrap_err();
        assert!(err.contains("numeric split on categorical feature 'job'"));
    }

    #[test]
    fn rejects_bad_threshold_and_format() {
        let artifact = ModelArtifact {
            threshold: 1.0,
            ..stump_artifact()
        };
        assert!(Model::from_artifact(artifact).is_err());

        let artifact = ModelArtifact {
            format: "pickle".to_string(),
            ..stump_artifact()
        };
        assert!(Model::from_artifact(artifact).unwrap_err().contains("pickle"));
    }

    #[test]
    fn unseen_category_is_schema_mismatch() {
        let mut artifact = stump_artifact();
        artifact
            .categories
            .insert("job".to_string(), vec!["admin.".to_string(), "services".to_string()]);
        let model = Model::from_artifact(artifact).unwrap();
        let err = model
            .predict(&record(FeatureFields {
                job: Job::Student,
                ..FeatureFields::default()
            }))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnseenCategory {
                column: Column::Job,
                value: "student".to_string()
            }
        );
        assert!(model.predict(&record(FeatureFields::default())).is_ok());
    }

    #[test]
    fn extra_or_missing_columns_are_schema_mismatch() {
        let mut artifact = stump_artifact();
        artifact.features.push("duration".to_string());
        let model = Model::from_artifact(artifact).unwrap();
        assert_eq!(
            model.predict(&record(FeatureFields::default())).unwrap_err(),
            ModelError::UnknownFeature("duration".to_string())
        );

        let mut artifact = stump_artifact();
        artifact.features.pop();
        // keep tree feature indices valid after dropping pdays
        if let ScorerSpec::Gbdt(spec) = &mut artifact.model {
            spec.trees.remove(0);
        }
        let model = Model::from_artifact(artifact).unwrap();
        assert_eq!(
            model.check_schema().unwrap_err(),
            ModelError::MissingFeature(Column::Pdays)
        );
    }

    #[test]
    fn rejects_orphan_nodes() {
        let mut artifact = stump_artifact();
        if let ScorerSpec::Gbdt(spec) = &mut artifact.model {
            // node 3 hangs off nothing
            spec.trees[0].nodes.push(NodeSpec::Leaf(9.0));
        }
        let err = Model::from_artifact(artifact).unwrap_err();
        assert!(err.contains("tree 0, node 3: not reachable"), "{err}");

        let mut artifact = stump_artifact();
        if let ScorerSpec::Gbdt(spec) = &mut artifact.model {
            spec.trees[1].nodes = vec![NodeSpec::Leaf(0.5), NodeSpec::Leaf(0.1)];
        }
        assert!(Model::from_artifact(artifact).unwrap_err().contains("tree 1, node 1"));
    }

    #[test]
    fn even_odds_predict_no() {
        let artifact = ModelArtifact {
            model: ScorerSpec::Gbdt(GbdtSpec {
                base_score: 0.0,
                trees: vec![TreeSpec {
                    nodes: vec![NodeSpec::Leaf(0.0)],
                }],
            }),
            ..stump_artifact()
        };
        let model = Model::from_artifact(artifact).unwrap();
        let p = model.predict(&record(FeatureFields::default())).unwrap();
        assert_eq!(p.probabilities.p_yes, 0.5);
        assert_eq!(p.label, Label::No);
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }
}
