use serde::Serialize;

/// Which conversation-state values surface on a lead record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LeadSummary {
    pub fields: Vec<LeadSummaryField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_options: Option<Vec<SourceOption>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadSummaryField {
    pub key: String,
    pub label: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceOption {
    pub value: String,
    pub label: String,
}

/// Ordered stage-id to label mapping used to group leads by the node they reached.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LeadKanban {
    pub stages: Vec<KanbanStage>,
}

/// A kanban column. `id` is conventionally a node id but is never checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanStage {
    pub id: String,
    pub label: String,
}
