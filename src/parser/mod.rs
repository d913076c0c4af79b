pub mod html_element;
