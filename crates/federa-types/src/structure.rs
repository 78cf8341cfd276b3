use crate::types::ComputationType;

impl ComputationType {
    /// Recursively flatten nested structs into their leaf types, in order.
    ///
    /// Anything that is not a struct is a leaf, including a federated type
    /// whose member is a struct. An empty struct contributes no leaves.
    pub fn flatten(&self) -> Vec<&ComputationType> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }
}

fn collect_leaves<'a>(t: &'a ComputationType, leaves: &mut Vec<&'a ComputationType>) {
    match t {
        ComputationType::Struct(st) => {
            for element in st.iter() {
                collect_leaves(element, leaves);
            }
        }
        other => leaves.push(other),
    }
}
