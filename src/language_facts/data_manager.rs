use super::{
    data_provider::{HTMLDataProvider, IHTMLDataProvider},
    web_custom_data::HTML_DATA,
};

/// The schema lookup, every provider is asked in order
pub struct HTMLDataManager {
    data_providers: Vec<Box<dyn IHTMLDataProvider>>,
}

impl Default for HTMLDataManager {
    fn default() -> Self {
        HTMLDataManager::new(true, None)
    }
}

impl HTMLDataManager {
    pub fn new(
        use_default_data_provider: bool,
        custom_data_providers: Option<Vec<Box<dyn IHTMLDataProvider>>>,
    ) -> HTMLDataManager {
        let mut data_manager = HTMLDataManager {
            data_providers: vec![],
        };
        data_manager.set_data_providers(
            use_default_data_provider,
            custom_data_providers.unwrap_or_default(),
        );
        data_manager
    }

    pub fn set_data_providers(
        &mut self,
        built_in: bool,
        mut providers: Vec<Box<dyn IHTMLDataProvider>>,
    ) {
        self.data_providers.clear();
        if built_in {
            match HTMLDataProvider::from_json("html5", HTML_DATA) {
                Ok(provider) => self.data_providers.push(Box::new(provider)),
                Err(error) => tracing::warn!(%error, "Built-in html data is unusable"),
            }
        }
        self.data_providers.append(&mut providers);
    }

    pub fn get_data_providers(&self) -> &Vec<Box<dyn IHTMLDataProvider>> {
        &self.data_providers
    }

    /// Every value the schema knows for `attribute` on `tag`, in provider order.
    ///
    /// Unknown elements or attributes give an empty list.
    pub fn get_attribute_values(
        &self,
        tag: &str,
        attribute: &str,
        language_id: &str,
    ) -> Vec<String> {
        let mut values: Vec<String> = vec![];
        for provider in &self.data_providers {
            if !provider.is_applicable(language_id) {
                continue;
            }
            for value in provider.provide_values(tag, attribute) {
                if !values.contains(&value.name) {
                    values.push(value.name.clone());
                }
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_values() {
        let data_manager = HTMLDataManager::default();
        let charsets = data_manager.get_attribute_values("meta", "charset", "html");
        assert_eq!(charsets.first().map(String::as_str), Some("utf-8"));
        assert!(data_manager
            .get_attribute_values("link", "rel", "html")
            .contains(&"logo".to_string()));
    }

    #[test]
    fn unknown_lookups_are_empty() {
        let data_manager = HTMLDataManager::default();
        assert!(data_manager.get_attribute_values("blink", "speed", "html").is_empty());
        assert!(data_manager.get_attribute_values("meta", "speed", "html").is_empty());
        assert!(HTMLDataManager::new(false, None)
            .get_attribute_values("meta", "charset", "html")
            .is_empty());
    }

    #[test]
    fn custom_providers_follow_the_built_in_one() {
        let custom = HTMLDataProvider::from_json(
            "custom",
            r#"{ "version": 1.1, "tags": [{ "name": "meta", "attributes": [
                { "name": "charset", "values": [{ "name": "x-custom" }, { "name": "utf-8" }] }
            ] }] }"#,
        )
        .unwrap();
        let data_manager = HTMLDataManager::new(true, Some(vec![Box::new(custom)]));
        let charsets = data_manager.get_attribute_values("meta", "charset", "html");
        assert_eq!(charsets.last().map(String::as_str), Some("x-custom"));
        assert_eq!(charsets.iter().filter(|c| *c == "utf-8").count(), 1);
    }
}
