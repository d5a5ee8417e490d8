//! Collection creation and membership.

use serde_json::{Value, json};

use sourcebridge_platform::requests::entity_ref;
use sourcebridge_shared::{Args, EntityRef, ParamSpec, Result, SourceBridgeError};

use super::{call, entity_refs, id_payload};
use crate::registry::Dispatcher;

pub fn create_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("name", "Collection name.").required(),
        ParamSpec::string_list("contents", "Content ids to add right away."),
    ]
}

pub fn membership_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::string("id", "Collection id.").required(),
        ParamSpec::string_list("contents", "Content ids.").required(),
    ]
}

pub async fn create(d: &Dispatcher, args: &Args) -> Result<Value> {
    let mut collection = json!({ "name": args.str("name")? });
    let contents = args.str_list("contents");
    if !contents.is_empty() {
        collection["contents"] = json!(entity_refs(contents));
    }
    let data = call(d, "createCollection", json!({ "collection": collection })).await?;
    Ok(id_payload(&entity_ref("createCollection", data)?))
}

pub async fn add_contents(d: &Dispatcher, args: &Args) -> Result<Value> {
    let (collection, contents) = membership(args)?;
    call(
        d,
        "addContentsToCollections",
        json!({ "contents": contents, "collections": [collection] }),
    )
    .await?;
    Ok(json!({ "id": collection.id, "added": contents.len() }))
}

pub async fn remove_contents(d: &Dispatcher, args: &Args) -> Result<Value> {
    let (collection, contents) = membership(args)?;
    call(
        d,
        "removeContentsFromCollection",
        json!({ "contents": contents, "collection": collection }),
    )
    .await?;
    Ok(json!({ "id": collection.id, "removed": contents.len() }))
}

fn membership(args: &Args) -> Result<(EntityRef, Vec<EntityRef>)> {
    let contents = args.str_list("contents");
    if contents.is_empty() {
        return Err(SourceBridgeError::validation(
            "parameter 'contents' must list at least one content id",
        ));
    }
    Ok((EntityRef::new(args.str("id")?), entity_refs(contents)))
}
