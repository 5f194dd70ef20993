use {
	crate::{Config, Server},
	insta::assert_yaml_snapshot,
	pretty_assertions::assert_eq,
	tagkit_client::prelude::*,
};

fn add_arg(entity_type: &str, entity_id: &str, tag_id: &str) -> tg::tag::add::Arg {
	tg::tag::add::Arg {
		entity_id: entity_id.to_owned(),
		entity_type: entity_type.to_owned(),
		tag_id: tag_id.to_owned(),
	}
}

fn remove_arg(entity_type: &str, entity_id: &str, tag_id: &str) -> tg::tag::remove::Arg {
	tg::tag::remove::Arg {
		entity_id: entity_id.to_owned(),
		entity_type: entity_type.to_owned(),
		tag_id: tag_id.to_owned(),
	}
}

fn set_arg(entity_type: &str, entity_id: &str, tags: &[&str]) -> tg::tag::set::Arg {
	tg::tag::set::Arg {
		entity_id: entity_id.to_owned(),
		entity_type: entity_type.to_owned(),
		tags: tags.iter().map(ToString::to_string).collect(),
	}
}

#[tokio::test]
async fn no_tags() {
	let server = Server::new(Config::default());
	let entity = tg::tag::Entity::new("Page", "42");
	assert_eq!(server.try_get_entity_tags(&entity), None);
}

#[tokio::test]
async fn add_tags() -> tg::Result<()> {
	let server = Server::new(Config::default());
	server.add_tag_to_entity(add_arg("Page", "42", "7")).await?;
	server.add_tag_to_entity(add_arg("Page", "42", "3")).await?;
	server.add_tag_to_entity(add_arg("BlogPost", "42", "7")).await?;
	let tags = server.try_get_entity_tags(&tg::tag::Entity::new("Page", "42"));
	assert_yaml_snapshot!(tags, @r#"
	- "3"
	- "7"
	"#);
	let tags = server.try_get_entity_tags(&tg::tag::Entity::new("BlogPost", "42"));
	assert_yaml_snapshot!(tags, @r#"- "7""#);
	Ok(())
}

#[tokio::test]
async fn adding_a_tag_twice_is_a_conflict() -> tg::Result<()> {
	let server = Server::new(Config::default());
	server.add_tag_to_entity(add_arg("Page", "42", "7")).await?;
	let error = server
		.add_tag_to_entity(add_arg("Page", "42", "7"))
		.await
		.unwrap_err();
	assert_eq!(error.code, Some(tg::error::Code::Conflict));
	assert_eq!(error.values["entity"], "Page/42");
	assert_eq!(error.values["tag"], "7");
	Ok(())
}

#[tokio::test]
async fn remove_tags() -> tg::Result<()> {
	let server = Server::new(Config::default());
	let entity = tg::tag::Entity::new("Page", "42");
	server
		.set_entity_tags(set_arg("Page", "42", &["a", "b"]))
		.await?;
	server
		.remove_tag_from_entity(remove_arg("Page", "42", "a"))
		.await?;
	assert_eq!(
		server.try_get_entity_tags(&entity),
		Some(vec!["b".to_owned()])
	);
	server
		.remove_tag_from_entity(remove_arg("Page", "42", "b"))
		.await?;
	assert_eq!(server.try_get_entity_tags(&entity), None);
	Ok(())
}

#[tokio::test]
async fn removing_a_missing_tag_is_not_found() {
	let server = Server::new(Config::default());
	let error = server
		.remove_tag_from_entity(remove_arg("Page", "42", "7"))
		.await
		.unwrap_err();
	assert_eq!(error.code, Some(tg::error::Code::NotFound));
	assert_eq!(error.message, "the entity does not have the tag");
}

#[tokio::test]
async fn set_replaces_the_tags() -> tg::Result<()> {
	let server = Server::new(Config::default());
	let entity = tg::tag::Entity::new("Page", "42");
	server.add_tag_to_entity(add_arg("Page", "42", "old")).await?;
	server
		.set_entity_tags(set_arg("Page", "42", &["rust", "async", "rust"]))
		.await?;
	assert_yaml_snapshot!(server.try_get_entity_tags(&entity), @r"
	- async
	- rust
	");
	server.set_entity_tags(set_arg("Page", "42", &[])).await?;
	assert_eq!(server.try_get_entity_tags(&entity), None);
	Ok(())
}

#[tokio::test]
async fn empty_fields_are_bad_requests() {
	let server = Server::new(Config::default());
	let error = server
		.add_tag_to_entity(add_arg("", "42", "7"))
		.await
		.unwrap_err();
	assert_eq!(error.code, Some(tg::error::Code::BadRequest));
	let error = server
		.remove_tag_from_entity(remove_arg("Page", "", "7"))
		.await
		.unwrap_err();
	assert_eq!(error.code, Some(tg::error::Code::BadRequest));
	let error = server
		.set_entity_tags(set_arg("Page", "42", &["a", ""]))
		.await
		.unwrap_err();
	assert_eq!(error.message, "the tag id must not be empty");
}

#[tokio::test]
async fn concurrent_adds_to_one_entity() -> tg::Result<()> {
	let server = Server::new(Config::default());
	let tasks = (0..100).map(|index| {
		let server = server.clone();
		tokio::spawn(async move {
			server
				.add_tag_to_entity(add_arg("Page", "42", &format!("{index:03}")))
				.await
		})
	});
	for result in futures::future::join_all(tasks).await {
		result.unwrap()?;
	}
	let tags = server
		.try_get_entity_tags(&tg::tag::Entity::new("Page", "42"))
		.unwrap();
	assert_eq!(tags.len(), 100);
	assert_eq!(tags.first().map(String::as_str), Some("000"));
	assert_eq!(tags.last().map(String::as_str), Some("099"));
	Ok(())
}

#[tokio::test]
async fn the_server_is_a_handle() -> tg::Result<()> {
	async fn tag<H>(handle: &H) -> tg::Result<()>
	where
		H: tg::Handle,
	{
		handle.add_tag_to_entity(add_arg("Page", "1", "news")).await
	}
	let server = Server::new(Config::default());
	tag(&server).await?;
	assert_eq!(
		server.try_get_entity_tags(&tg::tag::Entity::new("Page", "1")),
		Some(vec!["news".to_owned()])
	);
	Ok(())
}
