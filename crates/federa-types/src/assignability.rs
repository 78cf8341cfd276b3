use crate::types::{ComputationType, FederatedType, FunctionType, StructType, TensorType};

impl ComputationType {
    /// Whether a value of type `source` can be used where `self` is expected.
    ///
    /// Rules:
    /// * tensors: same dtype and rank; every known target dimension must
    ///   equal the source dimension
    /// * structs: same length, names must match wherever the target names an
    ///   element, element types pairwise assignable; container tags are ignored
    /// * sequences: element types assignable
    /// * functions: contravariant in the parameter, covariant in the result
    /// * federated: same placement, member assignable, and an all-equal target
    ///   only accepts all-equal sources
    pub fn is_assignable_from(&self, source: &ComputationType) -> bool {
        match (self, source) {
            (ComputationType::Tensor(target), ComputationType::Tensor(source)) => {
                tensor_assignable(target, source)
            }
            (ComputationType::Struct(target), ComputationType::Struct(source)) => {
                struct_assignable(target, source)
            }
            (ComputationType::Sequence(target), ComputationType::Sequence(source)) => {
                target.is_assignable_from(source)
            }
            (ComputationType::Function(target), ComputationType::Function(source)) => {
                function_assignable(target, source)
            }
            (ComputationType::Federated(target), ComputationType::Federated(source)) => {
                federated_assignable(target, source)
            }
            _ => false,
        }
    }

    /// Mutual assignability
    pub fn is_equivalent_to(&self, other: &ComputationType) -> bool {
        self.is_assignable_from(other) && other.is_assignable_from(self)
    }
}

fn tensor_assignable(target: &TensorType, source: &TensorType) -> bool {
    target.dtype == source.dtype
        && target.shape.len() == source.shape.len()
        && target
            .shape
            .iter()
            .zip(&source.shape)
            .all(|(t, s)| t.is_none() || t == s)
}

fn struct_assignable(target: &StructType, source: &StructType) -> bool {
    if target.len() != source.len() {
        return false;
    }
    target.elements().iter().zip(source.elements()).all(|(t, s)| {
        let names_match = match &t.name {
            Some(name) => s.name.as_ref() == Some(name),
            None => true,
        };
        names_match && t.value_type.is_assignable_from(&s.value_type)
    })
}

fn function_assignable(target: &FunctionType, source: &FunctionType) -> bool {
    let parameters_match = match (target.parameter(), source.parameter()) {
        (None, None) => true,
        (Some(t), Some(s)) => s.is_assignable_from(t),
        _ => false,
    };
    parameters_match && target.result().is_assignable_from(source.result())
}

fn federated_assignable(target: &FederatedType, source: &FederatedType) -> bool {
    if target.placement != source.placement {
        return false;
    }
    if target.all_equal && !source.all_equal {
        return false;
    }
    target.member.is_assignable_from(&source.member)
}
