// bitcoind-rpc/src/methods/table.rs
//
// Copyright (c) 2025 Arcella Team
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE>
// or the MIT license <LICENSE-MIT>, at your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Declarative method-name to parameter-shape table.
//!
//! Each daemon method is described by a [`MethodSpec`]: its positional
//! parameters, the coercion applied to each, and what to send when the caller
//! leaves one out. The specs are plain data; [`MethodTable::insert`] replaces
//! a built-in entry when a daemon version expects a different shape.

use std::collections::BTreeMap;
use serde_json::Value;

use crate::error::{BitcoindError, Result as BitcoindResult};
use crate::methods::coerce::Coerce;

/// What is sent for a parameter the caller did not supply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamDefault {
    /// The caller must supply it.
    Required,
    /// Not sent when trailing; sent as `null` when a later parameter is supplied.
    Omit,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    EmptyArray,
}

impl ParamDefault {
    fn to_value(&self) -> Option<Value> {
        match self {
            ParamDefault::Required | ParamDefault::Omit => None,
            ParamDefault::Null => Some(Value::Null),
            ParamDefault::Bool(b) => Some(Value::Bool(*b)),
            ParamDefault::Int(i) => Some(Value::from(*i)),
            ParamDefault::Float(f) => Some(Value::from(*f)),
            ParamDefault::Str(s) => Some(Value::String(s.clone())),
            ParamDefault::EmptyArray => Some(Value::Array(Vec::new())),
        }
    }
}

impl std::fmt::Display for ParamDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamDefault::Required => write!(f, "required"),
            ParamDefault::Omit => write!(f, "omitted"),
            ParamDefault::Str(s) => write!(f, "{:?}", s),
            other => match other.to_value() {
                Some(v) => write!(f, "{}", v),
                None => Ok(()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub coerce: Coerce,
    pub default: ParamDefault,
}

/// One remote procedure and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn required(self, name: &str, coerce: Coerce) -> Self {
        self.optional(name, coerce, ParamDefault::Required)
    }

    pub fn optional(mut self, name: &str, coerce: Coerce, default: ParamDefault) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            coerce,
            default,
        });
        self
    }

    /// Builds the positional params sent to the daemon from the caller's arguments.
    ///
    /// Missing arguments take their defaults, every value goes through the
    /// parameter's coercion, and trailing [`ParamDefault::Omit`] parameters are
    /// dropped.
    pub fn build_params(&self, args: Vec<Value>) -> BitcoindResult<Vec<Value>> {
        if args.len() > self.params.len() {
            return Err(BitcoindError::TooManyArguments {
                method: self.name.clone(),
                max: self.params.len(),
                given: args.len(),
            });
        }

        let mut args = args.into_iter();
        let mut params = Vec::with_capacity(self.params.len());
        let mut keep = 0;

        for spec in &self.params {
            let value = match args.next() {
                Some(value) => Some(value),
                None => {
                    if spec.default == ParamDefault::Required {
                        return Err(BitcoindError::MissingArgument {
                            method: self.name.clone(),
                            param: spec.name.clone(),
                        });
                    }
                    spec.default.to_value()
                }
            };

            match value {
                Some(value) => {
                    let coerced = spec.coerce.apply(value).map_err(|reason| BitcoindError::InvalidArgument {
                        method: self.name.clone(),
                        param: spec.name.clone(),
                        reason,
                    })?;
                    params.push(coerced);
                    keep = params.len();
                }
                None => params.push(Value::Null),
            }
        }

        params.truncate(keep);
        Ok(params)
    }

    /// Turns command-line words into arguments for [`build_params`](Self::build_params).
    ///
    /// Words for string parameters are taken verbatim, so hashes and addresses
    /// made of digits survive. Other words are parsed as JSON when they are
    /// valid JSON and kept as strings otherwise.
    pub fn parse_cli_args(&self, words: &[String]) -> Vec<Value> {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| match self.params.get(i) {
                Some(spec) if spec.coerce == Coerce::String => Value::String(word.clone()),
                _ => parse_cli_value(word),
            })
            .collect()
    }

    /// One-line signature, e.g. `getbalance [account=null:string] [minconf=1:integer]`.
    pub fn usage(&self) -> String {
        let mut out = self.name.clone();
        for p in &self.params {
            let ty = match p.coerce {
                Coerce::Any => String::new(),
                other => format!(":{}", other.name()),
            };
            match &p.default {
                ParamDefault::Required => out.push_str(&format!(" <{}{}>", p.name, ty)),
                ParamDefault::Omit => out.push_str(&format!(" [{}{}]", p.name, ty)),
                default => out.push_str(&format!(" [{}={}{}]", p.name, default, ty)),
            }
        }
        out
    }
}

/// JSON when the word parses as JSON, otherwise the word as a string.
pub fn parse_cli_value(word: &str) -> Value {
    serde_json::from_str(word).unwrap_or_else(|_| Value::String(word.to_string()))
}

/// Lookup table of method specs keyed by method name.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: BTreeMap<String, MethodSpec>,
}

impl MethodTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The daemon methods known out of the box.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for spec in builtin_specs() {
            table.insert(spec);
        }
        table
    }

    /// Adds `spec`, returning the entry it replaced.
    pub fn insert(&mut self, spec: MethodSpec) -> Option<MethodSpec> {
        self.methods.insert(spec.name.clone(), spec)
    }

    pub fn get(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Specs in method-name order.
    pub fn iter(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods.values()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

fn builtin_specs() -> Vec<MethodSpec> {
    use Coerce::{Any, Bool, Float, Integer, String as Str};
    use ParamDefault::{EmptyArray, Int, Null, Omit};

    let m = MethodSpec::new;
    vec![
        m("abandontransaction").required("txid", Str),
        m("addmultisigaddress")
            .required("nrequired", Integer)
            .required("keys", Any)
            .optional("account", Str, Omit),
        m("backupwallet").required("destination", Str),
        m("createmultisig").required("nrequired", Any).required("keys", Any),
        m("createrawtransaction").required("transactions", Any).required("addresses", Any),
        m("decoderawtransaction").required("hex", Str),
        m("dumpprivkey").required("address", Str),
        m("encryptwallet").required("passphrase", Str),
        m("generate").required("nblocks", Any),
        m("getaccount").required("address", Str),
        m("getaccountaddress").required("account", Str),
        m("getaddressesbyaccount").required("account", Str),
        m("getbalance")
            .optional("account", Str, Null)
            .optional("minconf", Integer, Int(1)),
        m("getblock")
            .required("hash", Str)
            .optional("verbose", Any, ParamDefault::Bool(true)),
        m("getblockcount"),
        m("getblockhash").required("index", Any),
        m("getblocktemplate").optional("options", Any, Omit),
        m("getconnectioncount"),
        m("getdifficulty"),
        m("getgenerate"),
        m("gethashespersec"),
        m("getinfo"),
        m("getmemorypool").optional("data", Any, Omit),
        m("getmininginfo"),
        m("getnewaddress").optional("account", Str, Null),
        m("getpeerinfo"),
        m("getrawmempool").optional("verbose", Any, ParamDefault::Bool(false)),
        m("getrawtransaction")
            .required("txid", Str)
            .optional("verbose", Integer, ParamDefault::Bool(false)),
        m("getreceivedbyaccount")
            .optional("account", Str, Null)
            .optional("minconf", Any, Int(1)),
        m("getreceivedbyaddress")
            .optional("address", Any, Null)
            .optional("minconf", Any, Int(1)),
        m("gettransaction").required("txid", Str),
        m("gettxout")
            .required("txid", Str)
            .required("n", Any)
            .optional("includemempool", Any, ParamDefault::Bool(true)),
        m("gettxoutsetinfo"),
        m("getwork").optional("data", Any, Omit),
        m("help").optional("command", Str, Omit),
        m("importprivkey")
            .required("privkey", Str)
            .optional("label", Str, Null)
            .optional("rescan", Bool, ParamDefault::Bool(true)),
        m("invalidateblock").required("hash", Str),
        m("keypoolrefill"),
        m("listaccounts").optional("minconf", Integer, Int(1)),
        m("listaddressgroupings"),
        m("listlockunspent"),
        m("listreceivedbyaccount")
            .optional("minconf", Any, Int(1))
            .optional("includeempty", Any, ParamDefault::Bool(false)),
        m("listreceivedbyaddress")
            .optional("minconf", Integer, Int(1))
            .optional("includeempty", Any, ParamDefault::Bool(false)),
        m("listsinceblock")
            .optional("hash", Any, Null)
            .optional("minconf", Any, Int(1)),
        m("listtransactions")
            .optional("account", Str, Null)
            .optional("count", Any, Int(10))
            .optional("from", Any, Int(0)),
        m("listunspent")
            .optional("minconf", Any, Int(1))
            .optional("maxconf", Any, Int(999_999))
            .optional("addresses", Any, EmptyArray),
        m("lockunspent")
            .required("unlock", Bool)
            .optional("transactions", Any, Omit),
        m("move")
            .required("fromaccount", Str)
            .required("toaccount", Str)
            .required("amount", Float)
            .optional("minconf", Integer, Int(1))
            .optional("comment", Str, Null),
        m("sendfrom")
            .required("account", Str)
            .required("address", Str)
            .required("amount", Float)
            .optional("minconf", Any, Int(1))
            .optional("comment", Str, Omit)
            .optional("commentto", Str, Omit),
        m("sendmany")
            .required("fromaccount", Str)
            .required("addresses", Any)
            .optional("minconf", Any, Int(1))
            .optional("comment", Str, Omit),
        m("sendrawtransaction")
            .required("hex", Str)
            .optional("allowhighfees", Any, ParamDefault::Bool(false)),
        m("sendtoaddress")
            .required("address", Str)
            .required("amount", Any)
            .optional("comment", Str, Omit)
            .optional("commentto", Str, Omit),
        m("setaccount").required("address", Str).required("account", Str),
        m("setgenerate")
            .required("generate", Any)
            .optional("genproclimit", Any, Int(-1)),
        m("settxfee").required("amount", Any),
        m("signmessage").required("address", Str).required("message", Str),
        m("signrawtransaction")
            .required("hex", Str)
            .optional("txinfo", Any, EmptyArray)
            .optional("keys", Any, EmptyArray)
            .optional("sighashtype", Str, ParamDefault::Str("ALL".to_string())),
        m("stop"),
        m("submitblock").required("hexdata", Str),
        m("validateaddress").required("address", Str),
        m("verifymessage")
            .required("address", Str)
            .required("signature", Str)
            .required("message", Str),
        m("walletlock"),
        m("walletpassphrase").required("passphrase", Str).required("timeout", Any),
        m("walletpassphrasechange")
            .required("oldpassphrase", Str)
            .required("newpassphrase", Str),
    ]
}
