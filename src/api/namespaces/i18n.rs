use std::rc::Rc;

use serde_json::Value;

use crate::api::{Env, Namespace};
use crate::error::ShimError;
use crate::gateway::{complete_local, Dispatch};
use crate::payload::Arg;

pub fn build(_env: &Rc<Env>, base: Namespace) -> Result<Namespace, ShimError> {
    Ok(base
        .with_local("getUILanguage", get_ui_language)
        .with_unimplemented("getMessage"))
}

fn get_ui_language(_env: &Rc<Env>, mut args: Vec<Arg>) -> Dispatch {
    complete_local(Some(Value::String("en-US".to_string())), &mut args)
}
