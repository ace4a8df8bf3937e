//! Serializable definition of a program.
//!
//! Values are referred to positionally: `{"param": i}` is parameter `i` of the
//! enclosing function and `{"node": j, "result": k}` is result `k` of the
//! `j`-th node of the enclosing function body. Records inside `attributes`
//! are encoded as ordered field tuples and markers as a list of names; absent
//! records are omitted.
use crate::{Attributes, Type};
use hls_utils::Id;
use serde::{Deserialize, Serialize};

/// A complete program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramDef {
    pub functions: Vec<FunctionDef>,
}

/// A function and its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: Id,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Type>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<Type>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default)]
    pub body: Vec<NodeDef>,
}

/// A node in a function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub kind: KindDef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<ValueRef>,
    /// Result types. Calls with no listed results take the callee's return
    /// types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<Type>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

/// Node kinds with callees referred to by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindDef {
    Channel,
    Read,
    Write,
    Call(Id),
    Return,
    Loop,
    Op(Id),
}

/// Positional reference to a value within a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRef {
    Param {
        param: usize,
    },
    Result {
        node: usize,
        #[serde(default)]
        result: usize,
    },
}
